use typed_route::typed::{EmptyRequest, RedirectKind, RedirectResponse, RedirectTarget, Route};

/// Where the old directory moved to
pub struct UsersIndexTarget;

impl RedirectTarget for UsersIndexTarget {
    fn location() -> &'static str {
        "/users"
    }

    fn kind() -> RedirectKind {
        RedirectKind::Permanent
    }
}

/// `GET /people`, kept for old bookmarks
#[derive(Debug, Default, Clone, Copy)]
pub struct LegacyPeople;

impl Route for LegacyPeople {
    type Request = EmptyRequest;
    type Response = RedirectResponse<UsersIndexTarget>;

    fn path(&self) -> &str {
        "/people"
    }
}
