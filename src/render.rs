// ---------------- 页面渲染 ----------------
// 列表页：筛选表单 + 题目链接 + 分页；详情页：题干/选项/答案/解析 + 上一题/下一题

use crate::page::{Element, ElementKind, Link, NavRole, Page, Route, Select, SelectOption};
use crate::store::{difficulty_label, type_label, ListQuery, Question, QuestionBank};

pub const FILTER_FORM: &str = "filters";
pub const QUESTION_TEXT_ID: &str = "question-text";
pub const ANSWER_ID: &str = "answer";
pub const EXPLANATION_ID: &str = "explanation";

const SNIPPET_CHARS: usize = 40;

pub fn render(bank: &QuestionBank, route: &Route) -> Option<Page> {
    match route {
        Route::List(q) => Some(list_page(bank, q)),
        Route::Detail(id) => detail_page(bank, *id),
    }
}

fn text(kind: fn(String) -> ElementKind, s: impl Into<String>) -> Element {
    Element::new(kind(s.into()))
}

fn link(text: impl Into<String>, route: Route, nav: Option<NavRole>) -> Element {
    Element::new(ElementKind::Link(Link {
        text: text.into(),
        route,
        nav,
    }))
}

fn filter_select(name: &str, current: Option<&str>, options: Vec<(String, String)>) -> Element {
    let selected = current
        .and_then(|c| options.iter().position(|(v, _)| v == c))
        .unwrap_or(0);
    Element::new(ElementKind::Select(Select {
        name: name.into(),
        form: Some(FILTER_FORM.into()),
        options: options
            .into_iter()
            .map(|(value, label)| SelectOption { value, label })
            .collect(),
        selected,
    }))
    .with_id(&format!("filter-{}", name))
}

fn labelled(all: &str, values: Vec<String>, label: fn(&str) -> &str) -> Vec<(String, String)> {
    let mut out = vec![(String::new(), all.to_string())];
    out.extend(values.into_iter().map(|v| {
        let l = label(&v).to_string();
        (v, l)
    }));
    out
}

fn snippet(s: &str) -> String {
    let flat = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > SNIPPET_CHARS {
        let head: String = flat.chars().take(SNIPPET_CHARS).collect();
        format!("{}…", head)
    } else {
        flat
    }
}

fn badges(q: &Question) -> String {
    let mut out = String::new();
    if let Some(t) = q.question_type.as_deref() {
        out.push_str(&format!("[{}]", type_label(t)));
    }
    if let Some(d) = q.difficulty.as_deref() {
        out.push_str(&format!("[{}]", difficulty_label(d)));
    }
    if q.has_image {
        out.push_str("[图]");
    }
    out
}

pub fn list_page(bank: &QuestionBank, query: &ListQuery) -> Page {
    let res = bank.list(query);
    let mut page = Page::new(format!("题库 · 共 {} 题", res.total), Route::List(query.clone()));

    page.push(filter_select(
        "type",
        query.question_type.as_deref(),
        labelled("全部题型", bank.question_types(), type_label),
    ));
    page.push(filter_select(
        "difficulty",
        query.difficulty.as_deref(),
        labelled("全部难度", bank.difficulties(), difficulty_label),
    ));
    let has_image = query.has_image.map(|b| if b { "1" } else { "0" });
    page.push(filter_select(
        "has_image",
        has_image,
        vec![
            (String::new(), "图片不限".into()),
            ("1".into(), "有图".into()),
            ("0".into(), "无图".into()),
        ],
    ));
    page.push(Element::new(ElementKind::Submit {
        form: FILTER_FORM.into(),
        label: "筛选".into(),
    }));
    page.push(Element::new(ElementKind::Separator));

    if res.questions.is_empty() {
        page.push(text(ElementKind::Meta, "没有符合条件的题目"));
    }
    for q in &res.questions {
        page.push(link(
            format!("#{:<5} {} {}", q.id, badges(q), snippet(&q.question_text)),
            Route::Detail(q.id),
            None,
        ));
    }

    page.push(Element::new(ElementKind::Separator));
    page.push(text(
        ElementKind::Meta,
        format!("第 {} / {} 页", res.page, res.total_pages.max(1)),
    ));
    if res.page > 1 {
        page.push(link(
            "上一页",
            Route::List(query.with_page(res.page - 1)),
            None,
        ));
    }
    if res.page < res.total_pages {
        page.push(link(
            "下一页",
            Route::List(query.with_page(res.page + 1)),
            None,
        ));
    }
    page.focus_first();
    page
}

pub fn detail_page(bank: &QuestionBank, id: i64) -> Option<Page> {
    let q = bank.get(id)?;
    let mut page = Page::new(format!("题目 #{}", q.id), Route::Detail(q.id));

    page.push(text(ElementKind::Heading, format!("题目 #{} {}", q.id, badges(q))));
    let mut meta = Vec::new();
    if let Some(n) = q.page_number {
        meta.push(format!("第 {} 页", n));
    }
    if let Some(ts) = q.created_at {
        meta.push(format!("录入于 {}", ts.format("%Y-%m-%d")));
    }
    if let Some(p) = q.image_path.as_deref() {
        meta.push(format!("图片: {}", p));
    }
    if !meta.is_empty() {
        page.push(text(ElementKind::Meta, meta.join(" · ")));
    }
    page.push(text(ElementKind::Text, q.question_text.clone()).with_id(QUESTION_TEXT_ID));
    let mut options: Vec<_> = q.options.iter().collect();
    options.sort_by(|a, b| a.key.cmp(&b.key));
    for opt in options {
        page.push(text(ElementKind::Text, format!("{}. {}", opt.key, opt.text)));
    }

    let answer = q
        .correct_answer
        .clone()
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| {
            q.options
                .iter()
                .filter(|o| o.is_correct)
                .map(|o| o.key.as_str())
                .collect::<Vec<_>>()
                .join("")
        });
    page.push(
        text(ElementKind::Text, format!("答案: {}", answer))
            .with_id(ANSWER_ID)
            .hidden(),
    );
    page.push(
        text(
            ElementKind::Text,
            format!("解析: {}", q.explanation.as_deref().unwrap_or("暂无")),
        )
        .with_id(EXPLANATION_ID)
        .hidden(),
    );
    if !q.tags.is_empty() {
        page.push(text(ElementKind::Meta, format!("标签: {}", q.tags.join(" / "))));
    }

    page.push(Element::new(ElementKind::Separator));
    if let Some(prev) = bank.prev(q.id) {
        page.push(link("← 上一题", Route::Detail(prev.id), Some(NavRole::Prev)));
    }
    page.push(link("返回列表", Route::List(ListQuery::default()), None));
    if let Some(next) = bank.next(q.id) {
        page.push(link("下一题 →", Route::Detail(next.id), Some(NavRole::Next)));
    }
    page.focus_first();
    Some(page)
}
