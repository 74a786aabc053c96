use serde::{Deserialize, Serialize};

/// Page metadata returned with every list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pagination {
    pub page_num: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    /// Derive page flags from a page position and item count.
    pub fn compute(page_num: u32, page_size: u32, total_items: u64) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            u32::try_from(total_items.div_ceil(u64::from(page_size))).unwrap_or(u32::MAX)
        };
        Self {
            page_num,
            page_size,
            total_items,
            total_pages,
            has_next: u64::from(page_num) * u64::from(page_size) < total_items,
            has_prev: page_num > 1,
        }
    }

    /// 1-based index of the first item on this page, 0 when empty.
    pub fn first_item(&self) -> u64 {
        if self.total_items == 0 {
            return 0;
        }
        u64::from(self.page_num.saturating_sub(1)) * u64::from(self.page_size) + 1
    }

    pub fn last_item(&self) -> u64 {
        (u64::from(self.page_num) * u64::from(self.page_size)).min(self.total_items)
    }

    /// Page numbers to show in a pager, at most `window` wide around the current page.
    pub fn visible_pages(&self, window: u32) -> Vec<u32> {
        if self.total_pages == 0 || window == 0 {
            return Vec::new();
        }
        let window = window.min(self.total_pages);
        let half = window / 2;
        let start = self
            .page_num
            .saturating_sub(half)
            .max(1)
            .min(self.total_pages - window + 1);
        (start..start + window).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_page_of_twenty_five() {
        let p = Pagination::compute(2, 25, 51);
        assert!(p.has_prev);
        assert!(p.has_next);
        assert_eq!(p.total_pages, 3);

        let p = Pagination::compute(2, 25, 50);
        assert!(p.has_prev);
        assert!(!p.has_next);
        assert_eq!(p.total_pages, 2);
    }

    #[test]
    fn test_first_page_has_no_prev() {
        let p = Pagination::compute(1, 10, 5);
        assert!(!p.has_prev);
        assert!(!p.has_next);
        assert_eq!(p.first_item(), 1);
        assert_eq!(p.last_item(), 5);
    }

    #[test]
    fn test_page_count_saturates() {
        let p = Pagination::compute(1, 1, u64::from(u32::MAX) + 10);
        assert_eq!(p.total_pages, u32::MAX);
        assert!(p.has_next);
    }

    #[test]
    fn test_empty_result() {
        let p = Pagination::compute(1, 25, 0);
        assert_eq!(p.total_pages, 0);
        assert_eq!(p.first_item(), 0);
        assert!(p.visible_pages(5).is_empty());
    }

    #[test]
    fn test_visible_pages_window() {
        let p = Pagination::compute(5, 10, 100);
        assert_eq!(p.visible_pages(5), vec![3, 4, 5, 6, 7]);

        let p = Pagination::compute(1, 10, 100);
        assert_eq!(p.visible_pages(5), vec![1, 2, 3, 4, 5]);

        let p = Pagination::compute(10, 10, 100);
        assert_eq!(p.visible_pages(5), vec![6, 7, 8, 9, 10]);

        let p = Pagination::compute(1, 10, 20);
        assert_eq!(p.visible_pages(5), vec![1, 2]);
    }

    #[test]
    fn test_deserialize_wire_shape() {
        let json = r#"{"page_num":1,"page_size":25,"total_items":40,"total_pages":2,"has_next":true,"has_prev":false}"#;
        let p: Pagination = serde_json::from_str(json).unwrap();
        assert_eq!(p, Pagination::compute(1, 25, 40));
    }
}
