pub const USER_COL_NAME: &str = "users";
pub const SESSION_COL_NAME: &str = "sessions";
pub const TRANSACTION_COL_NAME: &str = "transactions";
pub const NOTIFICATION_COL_NAME: &str = "notifications";
pub const CHAT_COL_NAME: &str = "chats";
pub const REFRESH_TOKEN_COL_NAME: &str = "refresh_tokens";

pub const DEFAULT_DB_NAME: &str = "mentorhub";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_CLIENT_URL: &str = "http://localhost:3000";

pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 15;
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 7;

pub const DEFAULT_PAYOUT_THRESHOLD: i64 = 5_000;
pub const MAX_ADD_FUNDS_AMOUNT: i64 = 1_000_000;

pub const MIN_SESSION_MINUTES: u32 = 15;
pub const MAX_SESSION_MINUTES: u32 = 240;
pub const SESSION_MINUTE_STEP: u32 = 15;
pub const MIN_GROUP_CAPACITY: u32 = 2;
pub const MAX_GROUP_CAPACITY: u32 = 50;

pub const MIN_HOURLY_RATE: i64 = 100;
pub const MAX_HOURLY_RATE: i64 = 100_000;
pub const MAX_SLOTS_PER_DAY: usize = 48;
pub const MAX_EXPERTISE_ENTRIES: usize = 20;

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;
