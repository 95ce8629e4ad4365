/// The five monetary columns of the APOTEOSYS export, summed field-wise
/// everywhere a row or bucket is totaled.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Execution {
    pub available: f64,
    pub committed: f64,
    pub disbursed: f64,
    pub appropriation_balance: f64,
    pub unexecuted: f64,
}

impl Execution {
    pub fn accumulate(&mut self, other: &Execution) {
        self.available += other.available;
        self.committed += other.committed;
        self.disbursed += other.disbursed;
        self.appropriation_balance += other.appropriation_balance;
        self.unexecuted += other.unexecuted;
    }

    pub fn is_zero(&self) -> bool {
        self.available == 0.0
            && self.committed == 0.0
            && self.disbursed == 0.0
            && self.appropriation_balance == 0.0
            && self.unexecuted == 0.0
    }
}

/// One record as parsed from the export, before forward-fill.
#[derive(Debug, Clone)]
pub struct RawRow {
    pub code: String,
    pub concept: String,
    pub source: String,
    pub exec: Execution,
}

/// One record after classification. Built once per load, read-only input
/// to every aggregation run.
#[derive(Debug, Clone)]
pub struct Row {
    /// Last qualifying code at or before this row, or empty if none.
    pub hierarchical_code: String,
    /// Forward-filled expense-concept label.
    pub concept: String,
    pub source: String,
    /// Last two characters of `hierarchical_code` as an integer.
    pub range_key: Option<u32>,
    pub exec: Execution,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BucketKind {
    Leaf,
    Rollup,
}

#[derive(Debug, Clone)]
pub struct Bucket {
    pub name: &'static str,
    pub kind: BucketKind,
    pub totals: Execution,
    /// Rows contributing to a leaf bucket; 0 for roll-ups.
    pub matched: usize,
}

/// One named view: an ordered sequence of leaf and roll-up buckets.
#[derive(Debug, Clone)]
pub struct Report {
    pub title: String,
    pub buckets: Vec<Bucket>,
}

impl Report {
    pub fn get(&self, name: &str) -> Option<&Bucket> {
        self.buckets.iter().find(|b| b.name == name)
    }

    /// False when every leaf bucket matched zero rows — the renderer
    /// shows a "no data found" notice instead of a table of zeros.
    pub fn has_matches(&self) -> bool {
        self.buckets
            .iter()
            .any(|b| b.kind == BucketKind::Leaf && b.matched > 0)
    }
}
