// 键盘导航：← 上一题，→ 下一题（按住 Ctrl/Cmd 时不处理）

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::page::{NavRole, Page, Route};

#[derive(Debug)]
pub struct KeyboardNavigator {
    subscribed: bool,
}

impl KeyboardNavigator {
    pub fn subscribe() -> Self {
        tracing::debug!("键盘导航已订阅");
        Self { subscribed: true }
    }

    pub fn unsubscribe(&mut self) {
        if self.subscribed {
            self.subscribed = false;
            tracing::debug!("键盘导航已取消订阅");
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// 返回被激活链接的路由，按文档顺序；同一角色的链接全部激活。
    pub fn handle_key(&self, key: &KeyEvent, page: &Page) -> Vec<Route> {
        if !self.subscribed {
            return Vec::new();
        }
        let Some(role) = nav_role_for(key) else {
            return Vec::new();
        };
        page.links()
            .filter(|l| l.nav == Some(role))
            .map(|l| l.route.clone())
            .collect()
    }
}

impl Drop for KeyboardNavigator {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

fn nav_role_for(key: &KeyEvent) -> Option<NavRole> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let blocked = KeyModifiers::CONTROL | KeyModifiers::SUPER | KeyModifiers::META;
    if key.modifiers.intersects(blocked) {
        return None;
    }
    match key.code {
        KeyCode::Left => Some(NavRole::Prev),
        KeyCode::Right => Some(NavRole::Next),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::tests::link;
    use crate::store::ListQuery;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn detail_page(prev_links: usize, next_links: usize) -> Page {
        let mut p = Page::new("题目 #5", Route::Detail(5));
        for i in 0..prev_links {
            p.push(link("← 上一题", Route::Detail(4 - i as i64), Some(NavRole::Prev)));
        }
        p.push(link("返回列表", Route::List(ListQuery::default()), None));
        // 显示文字相同但没有导航角色的链接不参与
        p.push(link("上一题的解析", Route::Detail(100), None));
        for i in 0..next_links {
            p.push(link("下一题 →", Route::Detail(6 + i as i64), Some(NavRole::Next)));
        }
        p
    }

    #[test]
    fn left_activates_single_prev_link() {
        let nav = KeyboardNavigator::subscribe();
        let p = detail_page(1, 1);
        assert_eq!(
            nav.handle_key(&key(KeyCode::Left, KeyModifiers::NONE), &p),
            vec![Route::Detail(4)]
        );
        assert_eq!(
            nav.handle_key(&key(KeyCode::Right, KeyModifiers::SHIFT), &p),
            vec![Route::Detail(6)]
        );
    }

    #[test]
    fn modified_arrows_do_nothing() {
        let nav = KeyboardNavigator::subscribe();
        let p = detail_page(1, 1);
        for m in [KeyModifiers::CONTROL, KeyModifiers::SUPER, KeyModifiers::META] {
            assert!(nav.handle_key(&key(KeyCode::Left, m), &p).is_empty());
            assert!(nav.handle_key(&key(KeyCode::Right, m), &p).is_empty());
        }
    }

    #[test]
    fn missing_next_link_is_a_no_op() {
        let nav = KeyboardNavigator::subscribe();
        let p = detail_page(1, 0);
        assert!(nav
            .handle_key(&key(KeyCode::Right, KeyModifiers::NONE), &p)
            .is_empty());
    }

    #[test]
    fn all_matching_links_are_activated() {
        let nav = KeyboardNavigator::subscribe();
        let p = detail_page(2, 0);
        assert_eq!(
            nav.handle_key(&key(KeyCode::Left, KeyModifiers::NONE), &p),
            vec![Route::Detail(4), Route::Detail(3)]
        );
    }

    #[test]
    fn other_keys_and_releases_are_ignored() {
        let nav = KeyboardNavigator::subscribe();
        let p = detail_page(1, 1);
        assert!(nav
            .handle_key(&key(KeyCode::Up, KeyModifiers::NONE), &p)
            .is_empty());
        let mut release = key(KeyCode::Left, KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert!(nav.handle_key(&release, &p).is_empty());
    }

    #[test]
    fn unsubscribed_navigator_is_inert() {
        let mut nav = KeyboardNavigator::subscribe();
        nav.unsubscribe();
        assert!(!nav.is_subscribed());
        let p = detail_page(1, 1);
        assert!(nav
            .handle_key(&key(KeyCode::Left, KeyModifiers::NONE), &p)
            .is_empty());
    }
}
