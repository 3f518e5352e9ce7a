//! Small pieces of business logic shared by the server and its clients.

/// Keeps the wishlist entries that carry text; blank and whitespace-only
/// entries are dropped, the rest keep their original spelling.
pub fn non_blank_wishes<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items
        .into_iter()
        .map(Into::into)
        .filter(|s| !s.trim().is_empty())
        .collect()
}

/// Optional free-text donor field: blank input counts as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Pledge counts for one party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PledgeTally {
    pub total: usize,
    pub pledged: usize,
}

impl PledgeTally {
    pub fn from_flags<I: IntoIterator<Item = bool>>(flags: I) -> Self {
        flags.into_iter().fold(Self::default(), |mut t, pledged| {
            t.total += 1;
            if pledged {
                t.pledged += 1;
            }
            t
        })
    }

    pub fn waiting(&self) -> usize {
        self.total - self.pledged
    }

    /// Rounded integer percentage; zero when there are no children.
    pub fn rate_percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.pledged as f64 / self.total as f64) * 100.0).round() as u32
    }

    pub fn rate_label(&self) -> String {
        format!("{}%", self.rate_percent())
    }
}
