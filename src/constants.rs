pub const RECEIPT_CREATED: &str = "RECEIPT_CREATED";
pub const RECEIPT_UPDATED: &str = "RECEIPT_UPDATED";
pub const RECEIPT_DELETED: &str = "RECEIPT_DELETED";
pub const ITEMS_BATCH_UPDATED: &str = "ITEMS_BATCH_UPDATED";
pub const ITEM_DELETED: &str = "ITEM_DELETED";
pub const ITEM_CATEGORY_UPDATED: &str = "ITEM_CATEGORY_UPDATED";
pub const CATEGORY_ADDED: &str = "CATEGORY_ADDED";
pub const RECEIPTS_SEARCHED: &str = "RECEIPTS_SEARCHED";

/// View invalidated after any receipt mutation.
pub const DASHBOARD_PATH: &str = "/dashboard";

pub const MAX_NAME_LENGTH: usize = 200;
