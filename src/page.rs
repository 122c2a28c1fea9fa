// ---------------- 页面文档模型 ----------------
// 渲染后的页面是一组扁平元素：标题、文本、链接、下拉框、提交按钮。
// 交互脚本（筛选、键盘导航、显隐切换）只针对这个模型工作。

use crate::store::ListQuery;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    List(ListQuery),
    Detail(i64),
}

/// 标记上一题/下一题链接的稳定属性，与显示文字无关。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavRole {
    Prev,
    Next,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub text: String,
    pub route: Route,
    pub nav: Option<NavRole>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Select {
    pub name: String,
    pub form: Option<String>,
    pub options: Vec<SelectOption>,
    pub selected: usize,
}

impl Select {
    pub fn value(&self) -> &str {
        self.options
            .get(self.selected)
            .map(|o| o.value.as_str())
            .unwrap_or("")
    }

    pub fn selected_label(&self) -> &str {
        self.options
            .get(self.selected)
            .map(|o| o.label.as_str())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    Heading(String),
    Text(String),
    Meta(String),
    Link(Link),
    Select(Select),
    Submit { form: String, label: String },
    Separator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub id: Option<String>,
    pub hidden: bool,
    pub kind: ElementKind,
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            id: None,
            hidden: false,
            kind,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn is_interactive(&self) -> bool {
        matches!(
            self.kind,
            ElementKind::Link(_) | ElementKind::Select(_) | ElementKind::Submit { .. }
        )
    }

    /// 元素的可见文字，用于复制等场景。
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Heading(s) | ElementKind::Text(s) | ElementKind::Meta(s) => Some(s),
            ElementKind::Link(l) => Some(&l.text),
            ElementKind::Submit { label, .. } => Some(label),
            ElementKind::Select(_) | ElementKind::Separator => None,
        }
    }
}

/// 下拉框取值变化事件（相当于 change 事件）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub element: usize,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub route: Route,
    pub elements: Vec<Element>,
    pub focus: Option<usize>,
}

impl Page {
    pub fn new(title: impl Into<String>, route: Route) -> Self {
        Self {
            title: title.into(),
            route,
            elements: Vec::new(),
            focus: None,
        }
    }

    pub fn push(&mut self, el: Element) -> usize {
        self.elements.push(el);
        self.elements.len() - 1
    }

    pub fn element_by_id(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id.as_deref() == Some(id))
    }

    pub fn element_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements
            .iter_mut()
            .find(|e| e.id.as_deref() == Some(id))
    }

    pub fn text_of(&self, id: &str) -> Option<&str> {
        self.element_by_id(id).and_then(Element::text)
    }

    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.elements.iter().filter_map(|e| match &e.kind {
            ElementKind::Link(l) => Some(l),
            _ => None,
        })
    }

    /// 下标列表：名字在 `names` 之中的所有下拉框。
    pub fn selects_named(&self, names: &[&str]) -> Vec<usize> {
        self.elements
            .iter()
            .enumerate()
            .filter_map(|(i, e)| match &e.kind {
                ElementKind::Select(s) if names.contains(&s.name.as_str()) => Some(i),
                _ => None,
            })
            .collect()
    }

    pub fn select_at(&self, idx: usize) -> Option<&Select> {
        match self.elements.get(idx).map(|e| &e.kind) {
            Some(ElementKind::Select(s)) => Some(s),
            _ => None,
        }
    }

    /// 切换下拉框选项，返回 change 事件；取值未变或不是下拉框时返回 None。
    pub fn change_select(&mut self, idx: usize, delta: isize) -> Option<ChangeEvent> {
        let Some(ElementKind::Select(s)) = self.elements.get_mut(idx).map(|e| &mut e.kind) else {
            return None;
        };
        let n = s.options.len() as isize;
        if n < 2 {
            return None;
        }
        s.selected = (s.selected as isize + delta).rem_euclid(n) as usize;
        Some(ChangeEvent {
            element: idx,
            name: s.name.clone(),
            value: s.value().to_string(),
        })
    }

    /// 提交表单：收集属于该表单的下拉框，生成列表页路由（页码回到 1）。
    pub fn submit(&self, form: &str) -> Option<Route> {
        let mut query = match &self.route {
            Route::List(q) => q.with_page(1),
            Route::Detail(_) => ListQuery::default(),
        };
        let mut found = false;
        for e in &self.elements {
            let ElementKind::Select(s) = &e.kind else {
                continue;
            };
            if s.form.as_deref() != Some(form) {
                continue;
            }
            found = true;
            let v = s.value();
            let v = (!v.is_empty()).then(|| v.to_string());
            match s.name.as_str() {
                "type" => query.question_type = v,
                "difficulty" => query.difficulty = v,
                "has_image" => {
                    query.has_image = v.as_deref().map(|x| x == "1");
                }
                _ => {}
            }
        }
        found.then_some(Route::List(query))
    }

    /// 激活元素（点击链接或提交按钮）。
    pub fn activate(&self, idx: usize) -> Option<Route> {
        match self.elements.get(idx).map(|e| &e.kind) {
            Some(ElementKind::Link(l)) => Some(l.route.clone()),
            Some(ElementKind::Submit { form, .. }) => self.submit(form),
            _ => None,
        }
    }

    pub fn form_of(&self, idx: usize) -> Option<&str> {
        self.select_at(idx).and_then(|s| s.form.as_deref())
    }

    fn interactive(&self) -> Vec<usize> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_interactive() && !e.hidden)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn focus_first(&mut self) {
        self.focus = self.interactive().first().copied();
    }

    pub fn move_focus(&mut self, delta: isize) {
        let items = self.interactive();
        if items.is_empty() {
            self.focus = None;
            return;
        }
        let pos = self
            .focus
            .and_then(|f| items.iter().position(|&i| i == f))
            .map(|p| p as isize + delta)
            .unwrap_or(0)
            .clamp(0, items.len() as isize - 1);
        self.focus = Some(items[pos as usize]);
    }
}
