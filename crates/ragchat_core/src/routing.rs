/// Which lanes a query addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryTarget {
    /// Leading `<`: only the first lane.
    First,
    /// Leading `>`: only the last lane.
    Last,
    All,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedQuery {
    pub target: QueryTarget,
    /// Query text with the routing prefix and surrounding whitespace removed.
    pub text: String,
}

impl QueryTarget {
    /// Resolves the target to lane indices for `lane_count` lanes.
    pub fn lanes(self, lane_count: usize) -> Vec<usize> {
        match (self, lane_count) {
            (_, 0) => Vec::new(),
            (QueryTarget::First, _) => vec![0],
            (QueryTarget::Last, n) => vec![n - 1],
            (QueryTarget::All, n) => (0..n).collect(),
        }
    }
}

/// Splits the routing prefix off a raw query.
pub fn route_query(raw: &str) -> RoutedQuery {
    let trimmed = raw.trim();
    let (target, rest) = if let Some(rest) = trimmed.strip_prefix('<') {
        (QueryTarget::First, rest)
    } else if let Some(rest) = trimmed.strip_prefix('>') {
        (QueryTarget::Last, rest)
    } else {
        (QueryTarget::All, trimmed)
    };
    RoutedQuery {
        target,
        text: rest.trim().to_string(),
    }
}
