use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Layering,
    Smurfing,
    Cycling,
    SuddenActivity,
    PotentialExchange,
}

impl std::fmt::Display for PatternKind {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let name = match self {
            PatternKind::Layering => "layering",
            PatternKind::Smurfing => "smurfing",
            PatternKind::Cycling => "cycling",
            PatternKind::SuddenActivity => "sudden_activity",
            PatternKind::PotentialExchange => "potential_exchange",
        };
        write!(f, "{}", name)
    }
}

/// What a finding points at in the graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Subject {
    Address { address: String },
    Path { path: Vec<String> },
    Cycle { cycle: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayeringEvidence {
    pub amounts: Vec<f64>,
    pub relative_std: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmurfingEvidence {
    pub targets: Vec<String>,
    pub transaction_count: usize,
    pub avg_amount: f64,
    pub amount_cv: f64,
    pub max_time_interval: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CyclingEvidence {
    pub amounts: Vec<f64>,
    pub timestamps: Vec<i64>,
    pub amount_cv: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuddenActivityEvidence {
    pub cluster_size: usize,
    pub in_volume: f64,
    pub out_volume: f64,
    pub start_time: i64,
    pub end_time: i64,
    pub time_span: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeEvidence {
    pub in_degree: usize,
    pub out_degree: usize,
    pub volume: f64,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Evidence {
    Layering(LayeringEvidence),
    Smurfing(SmurfingEvidence),
    Cycling(CyclingEvidence),
    SuddenActivity(SuddenActivityEvidence),
    PotentialExchange(ExchangeEvidence),
}

/// Confidence-scored hypothesis produced by one analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternFinding {
    #[serde(rename = "type")]
    pub kind: PatternKind,
    pub confidence: f64,
    #[serde(flatten)]
    pub subject: Subject,
    pub details: Evidence,
}

impl PatternFinding {
    pub fn layering(
        path: Vec<String>,
        confidence: f64,
        evidence: LayeringEvidence,
    ) -> Self {
        Self {
            kind: PatternKind::Layering,
            confidence,
            subject: Subject::Path { path },
            details: Evidence::Layering(evidence),
        }
    }

    pub fn smurfing(
        address: impl Into<String>,
        confidence: f64,
        evidence: SmurfingEvidence,
    ) -> Self {
        Self {
            kind: PatternKind::Smurfing,
            confidence,
            subject: Subject::Address {
                address: address.into(),
            },
            details: Evidence::Smurfing(evidence),
        }
    }

    pub fn cycling(
        cycle: Vec<String>,
        confidence: f64,
        evidence: CyclingEvidence,
    ) -> Self {
        Self {
            kind: PatternKind::Cycling,
            confidence,
            subject: Subject::Cycle { cycle },
            details: Evidence::Cycling(evidence),
        }
    }

    pub fn sudden_activity(
        address: impl Into<String>,
        confidence: f64,
        evidence: SuddenActivityEvidence,
    ) -> Self {
        Self {
            kind: PatternKind::SuddenActivity,
            confidence,
            subject: Subject::Address {
                address: address.into(),
            },
            details: Evidence::SuddenActivity(evidence),
        }
    }

    pub fn potential_exchange(
        address: impl Into<String>,
        confidence: f64,
        evidence: ExchangeEvidence,
    ) -> Self {
        Self {
            kind: PatternKind::PotentialExchange,
            confidence,
            subject: Subject::Address {
                address: address.into(),
            },
            details: Evidence::PotentialExchange(evidence),
        }
    }

    /// Address the finding is anchored on, or the first node of its path/cycle.
    pub fn anchor(&self) -> Option<&str> {
        match &self.subject {
            Subject::Address { address } => Some(address),
            Subject::Path { path } => path.first().map(String::as_str),
            Subject::Cycle { cycle } => cycle.first().map(String::as_str),
        }
    }
}
