use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

use super::AdminCredentials;

pub const PARTIES: &str = "/parties";
pub const PLEDGE: &str = "/pledge";
pub const ADMIN_LOGIN: &str = "/admin/login";
pub const ADMIN_LOGOUT: &str = "/admin/logout";
pub const ADMIN_PARTY: &str = "/admin/party";
pub const ADMIN_CHILD: &str = "/admin/child";
pub const ADMIN_WISHLIST: &str = "/admin/wishlist";
pub const ADMIN_EXPORT: &str = "/admin/export";

fn base_join(base: &str, path: &str) -> String {
    let b = base.trim_end_matches('/');
    let p = path.trim_start_matches('/');
    format!("{}/{}", b, p)
}

fn enc(s: &str) -> String {
    utf8_percent_encode(s, NON_ALPHANUMERIC).to_string()
}

fn query(params: &[(&str, &str)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, enc(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn credential_params(creds: &AdminCredentials) -> Vec<(&'static str, &str)> {
    let mut out = Vec::with_capacity(2);
    if let Some(e) = creds.email.as_deref() {
        out.push(("email", e));
    }
    if let Some(p) = creds.password.as_deref() {
        out.push(("password", p));
    }
    out
}

pub fn parties(base: &str) -> String {
    base_join(base, PARTIES)
}
pub fn party(base: &str, id: i32) -> String {
    base_join(base, &format!("{}/{}", PARTIES, id))
}
pub fn pledge(base: &str) -> String {
    base_join(base, PLEDGE)
}
pub fn admin_login(base: &str) -> String {
    base_join(base, ADMIN_LOGIN)
}
pub fn admin_logout(base: &str) -> String {
    base_join(base, ADMIN_LOGOUT)
}

/// Admin collection URL (`/admin/party`, `/admin/child`, `/admin/wishlist`)
/// with credentials in the query string, as GET expects.
pub fn admin_list(base: &str, resource: &str, creds: &AdminCredentials) -> String {
    let q = query(&credential_params(creds));
    if q.is_empty() {
        base_join(base, resource)
    } else {
        format!("{}?{}", base_join(base, resource), q)
    }
}

/// DELETE URL: `id` plus credentials in the query string.
pub fn admin_delete(base: &str, resource: &str, id: i32, creds: &AdminCredentials) -> String {
    let id = id.to_string();
    let mut params = vec![("id", id.as_str())];
    params.extend(credential_params(creds));
    format!("{}?{}", base_join(base, resource), query(&params))
}

pub fn admin_export(base: &str, creds: &AdminCredentials) -> String {
    admin_list(base, ADMIN_EXPORT, creds)
}
