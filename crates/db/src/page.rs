/// One-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub limit: u32,
}

impl Page {
    pub fn new(number: u32, limit: u32) -> Self {
        Self { number, limit }
    }

    /// Row offset of the first record on this page.
    pub fn offset(&self) -> i64 {
        i64::from(self.number.saturating_sub(1)) * i64::from(self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_starts_at_zero() {
        assert_eq!(Page::new(1, 3).offset(), 0);
        assert_eq!(Page::new(0, 3).offset(), 0);
    }

    #[test]
    fn offset_is_page_minus_one_times_limit() {
        assert_eq!(Page::new(4, 3).offset(), 9);
        assert_eq!(Page::new(2, 100).offset(), 100);
    }
}
