use crate::config::ViewerConfig;
use crate::filters::FilterAutoSubmit;
use crate::keynav::KeyboardNavigator;
use crate::page::Page;

/// 一次页面载入所安装的交互绑定。
#[derive(Debug)]
pub struct PageBindings {
    pub filters: FilterAutoSubmit,
    pub navigator: KeyboardNavigator,
}

impl PageBindings {
    pub fn teardown(mut self) {
        self.navigator.unsubscribe();
    }
}

/// 页面构建完成后调用一次：先初始化筛选，再初始化键盘导航。
pub fn bootstrap(page: &Page, config: &ViewerConfig) -> PageBindings {
    let filters = FilterAutoSubmit::install(page, config.auto_submit_on_filter_change);
    let navigator = KeyboardNavigator::subscribe();
    tracing::debug!(title = %page.title, auto_submit = filters.is_active(), "页面已初始化");
    PageBindings { filters, navigator }
}
