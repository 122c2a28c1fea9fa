// 题库数据：从 JSON 导出文件载入，提供列表筛选/分页与上一题/下一题查询

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_PER_PAGE: usize = 20;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("题库文件不存在: {0}\n提示: 使用 --file 指定或设置环境变量 QBANK_DATA 指向正确路径。")]
    Missing(PathBuf),
    #[error("读取题库文件失败: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("解析题库 JSON 失败")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct QuestionOption {
    pub key: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    #[serde(default)]
    pub question_text: String,
    #[serde(default)]
    pub question_type: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub has_image: bool,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub page_number: Option<i64>,
    #[serde(default)]
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct BankFile {
    #[serde(default)]
    questions: Vec<Question>,
}

/// 列表页查询条件，对应筛选表单的字段。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub question_type: Option<String>,
    pub difficulty: Option<String>,
    pub has_image: Option<bool>,
    pub page: usize,
    pub per_page: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            question_type: None,
            difficulty: None,
            has_image: None,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl ListQuery {
    pub fn with_page(&self, page: usize) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }
}

#[derive(Debug)]
pub struct ListResult<'a> {
    pub questions: Vec<&'a Question>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn from_questions(mut questions: Vec<Question>) -> Self {
        questions.sort_by_key(|q| q.id);
        Self { questions }
    }

    pub fn load(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            return Err(StoreError::Missing(path.to_path_buf()));
        }
        let s = fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: BankFile = serde_json::from_str(&s)?;
        tracing::info!(path = %path.display(), count = file.questions.len(), "题库已载入");
        Ok(Self::from_questions(file.questions))
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&Question> {
        self.questions
            .binary_search_by_key(&id, |q| q.id)
            .ok()
            .map(|i| &self.questions[i])
    }

    pub fn prev(&self, id: i64) -> Option<&Question> {
        self.questions.iter().rev().find(|q| q.id < id)
    }

    pub fn next(&self, id: i64) -> Option<&Question> {
        self.questions.iter().find(|q| q.id > id)
    }

    pub fn list(&self, query: &ListQuery) -> ListResult<'_> {
        let matched: Vec<&Question> = self
            .questions
            .iter()
            .filter(|q| matches_query(q, query))
            .collect();
        let per_page = query.per_page.max(1);
        let page = query.page.max(1);
        let total = matched.len();
        let total_pages = total.div_ceil(per_page);
        let questions = matched
            .into_iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .collect();
        ListResult {
            questions,
            total,
            page,
            per_page,
            total_pages,
        }
    }

    pub fn question_types(&self) -> Vec<String> {
        distinct(self.questions.iter().filter_map(|q| q.question_type.as_deref()))
    }

    pub fn difficulties(&self) -> Vec<String> {
        distinct(self.questions.iter().filter_map(|q| q.difficulty.as_deref()))
    }
}

fn matches_query(q: &Question, query: &ListQuery) -> bool {
    if let Some(t) = &query.question_type {
        if q.question_type.as_deref() != Some(t.as_str()) {
            return false;
        }
    }
    if let Some(d) = &query.difficulty {
        if q.difficulty.as_deref() != Some(d.as_str()) {
            return false;
        }
    }
    if let Some(img) = query.has_image {
        if q.has_image != img {
            return false;
        }
    }
    true
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = values
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    out.sort();
    out.dedup();
    out
}

pub fn type_label(t: &str) -> &str {
    match t {
        "single_choice" => "单选题",
        "multiple_choice" => "多选题",
        "true_false" => "判断题",
        other => other,
    }
}

pub fn difficulty_label(d: &str) -> &str {
    match d {
        "easy" => "简单",
        "medium" => "中等",
        "hard" => "困难",
        other => other,
    }
}
