pub(crate) const DEFAULT_LISTEN: &str = "127.0.0.1:8080";
/// Request body cap for `POST /mine`; larger bodies get 413.
pub const MAX_MINE_BODY_BYTES: usize = 16 * 1024 * 1024;
