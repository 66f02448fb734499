/// Name of the zero-priced fallback line every school carries
pub const OTHER_ITEM_NAME: &str = "Other";

/// Unit label of the fallback line
pub const OTHER_ITEM_UNIT: &str = "item";

/// Value stored for optional submission fields left blank
pub const UNSPECIFIED: &str = "Unspecified";

/// Decimal precision for display and price estimates
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Prefix of every quotation number
pub const QUOTATION_NUMBER_PREFIX: &str = "Q";

/// How many numbering attempts a submission gets before giving up on collisions
pub const MAX_QUOTATION_NUMBER_ATTEMPTS: u32 = 5;
