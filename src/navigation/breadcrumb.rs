//! Address bar: home, bucket root, then one segment per folder level

/// One clickable folder level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub name: String,
    /// Cumulative prefix to navigate to, ending in "/"
    pub prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub bucket: String,
    pub segments: Vec<Segment>,
    /// Whether the bucket root is bookmarked (star state)
    pub bookmarked: bool,
}

/// Where a breadcrumb click leads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BreadcrumbTarget {
    /// Home button: back to the selector
    Selector,
    /// Navigate the pane to this prefix ("" is the bucket root)
    Prefix(String),
}

impl Breadcrumb {
    pub fn new(bucket: &str, prefix: &str, bookmarked: bool) -> Self {
        let mut cumulative = String::new();
        let segments = prefix
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|name| {
                cumulative.push_str(name);
                cumulative.push('/');
                Segment {
                    name: name.to_string(),
                    prefix: cumulative.clone(),
                }
            })
            .collect();

        Self {
            bucket: bucket.to_string(),
            segments,
            bookmarked,
        }
    }

    /// Click target by position: 0 is home, 1 the bucket, 2.. the segments
    pub fn target(&self, position: usize) -> Option<BreadcrumbTarget> {
        match position {
            0 => Some(BreadcrumbTarget::Selector),
            1 => Some(BreadcrumbTarget::Prefix(String::new())),
            n => self
                .segments
                .get(n - 2)
                .map(|segment| BreadcrumbTarget::Prefix(segment.prefix.clone())),
        }
    }

    /// Prefix one level up, if not already at the bucket root
    pub fn parent(&self) -> Option<String> {
        match self.segments.len() {
            0 => None,
            1 => Some(String::new()),
            n => Some(self.segments[n - 2].prefix.clone()),
        }
    }

    pub fn render(&self) -> String {
        let mut out = format!("~ / {}{}", self.bucket, if self.bookmarked { " *" } else { "" });
        for segment in &self.segments {
            out.push_str(" / ");
            out.push_str(&segment.name);
        }
        out
    }
}
