//! Fixed-width tenant field encoding.

/// Default width of the tenant field.
pub const DEFAULT_TENANT_WIDTH: usize = 5;

/// Widest tenant field a configuration may ask for.
pub const MAX_TENANT_WIDTH: usize = 64;

const PAD: char = '0';

/// Normalizes tenant identifiers into a fixed-width field.
///
/// Longer identifiers are truncated, so two tenants sharing the first
/// `width` characters encode to the same field. Width counts `char`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantEncoder {
    width: usize,
}

impl TenantEncoder {
    #[must_use]
    pub const fn new(width: usize) -> Self {
        Self { width }
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Truncates or right-pads `tenant_id` with `'0'` to exactly `width` chars.
    #[must_use]
    pub fn encode(&self, tenant_id: &str) -> String {
        let mut field: String = tenant_id.chars().take(self.width).collect();
        let len = field.chars().count();
        field.extend(std::iter::repeat_n(PAD, self.width - len));
        field
    }
}

impl Default for TenantEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_TENANT_WIDTH)
    }
}
