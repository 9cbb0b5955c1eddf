use std::fmt;
use std::str::FromStr;

/// The four fixed logical buckets of the object store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    Speakers,
    Photos,
    Videos,
    Presentations,
}

impl Bucket {
    pub const ALL: [Bucket; 4] = [
        Bucket::Speakers,
        Bucket::Photos,
        Bucket::Videos,
        Bucket::Presentations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Speakers => "speakers",
            Bucket::Photos => "photos",
            Bucket::Videos => "videos",
            Bucket::Presentations => "presentations",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Bucket::ALL
            .into_iter()
            .find(|bucket| bucket.as_str() == s)
            .ok_or_else(|| format!("Unknown bucket: {s}"))
    }
}
