use crate::analysis::detector::PatternDetector;
use crate::config::SuddenActivityConfig;
use crate::error::AnalysisError;
use crate::model::PatternFinding;
use crate::model::SuddenActivityEvidence;
use crate::model::TransactionGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    In,
    Out,
}

#[derive(Debug, Clone, Copy)]
struct Movement {
    direction: Direction,
    amount: f64,
    timestamp: i64,
}

/// Time-clustered bursts in which roughly as much leaves an address as enters it.
pub struct SuddenActivityDetector {
    config: SuddenActivityConfig,
}

impl SuddenActivityDetector {
    pub fn new(config: SuddenActivityConfig) -> Self {
        Self { config }
    }

    /// Greedy clustering: a movement joins the running burst while its gap to
    /// the previous one stays under `mean_gap * burst_gap_ratio`.
    fn bursts<'a>(
        &self,
        movements: &'a [Movement],
    ) -> Vec<&'a [Movement]> {
        let gaps: Vec<f64> = movements.windows(2).map(|pair| (pair[1].timestamp - pair[0].timestamp) as f64).collect();
        if gaps.is_empty() {
            return Vec::new();
        }
        let threshold = gaps.iter().sum::<f64>() / gaps.len() as f64 * self.config.burst_gap_ratio;

        let mut bursts = Vec::new();
        let mut start = 0;
        for (i, gap) in gaps.iter().enumerate() {
            if *gap < threshold {
                continue;
            }
            if i + 1 - start >= self.config.min_burst_size {
                bursts.push(&movements[start..=i]);
            }
            start = i + 1;
        }
        if movements.len() - start >= self.config.min_burst_size {
            bursts.push(&movements[start..]);
        }
        bursts
    }
}

impl PatternDetector for SuddenActivityDetector {
    fn name(&self) -> &'static str {
        "sudden_activity"
    }

    fn detect(
        &self,
        graph: &TransactionGraph,
    ) -> Result<Vec<PatternFinding>, AnalysisError> {
        let mut findings = Vec::new();

        for idx in graph.node_indices() {
            let node = graph.node_at(idx);
            if node.transaction_count < self.config.min_transaction_count {
                continue;
            }

            let inbound = graph.incoming(idx).into_iter().map(|(_, flow)| (Direction::In, flow));
            let outbound = graph.outgoing(idx).into_iter().map(|(_, flow)| (Direction::Out, flow));
            let mut movements: Vec<Movement> = inbound
                .chain(outbound)
                .flat_map(|(direction, flow)| {
                    flow.transfers().iter().map(move |t| Movement {
                        direction,
                        amount: t.amount,
                        timestamp: t.timestamp,
                    })
                })
                .collect();
            if movements.len() < self.config.min_transfers {
                continue;
            }
            movements.sort_by_key(|movement| movement.timestamp);

            for burst in self.bursts(&movements) {
                let volume = |direction: Direction| -> f64 {
                    burst.iter().filter(|m| m.direction == direction).map(|m| m.amount).sum()
                };
                let (in_volume, out_volume) = (volume(Direction::In), volume(Direction::Out));
                if in_volume <= 0.0 || out_volume <= 0.0 {
                    continue;
                }
                if in_volume.min(out_volume) / in_volume.max(out_volume) <= self.config.min_pass_through_ratio {
                    continue;
                }

                let (Some(first), Some(last)) = (burst.first(), burst.last()) else {
                    continue;
                };
                findings.push(PatternFinding::sudden_activity(
                    node.address.clone(),
                    self.config.confidence,
                    SuddenActivityEvidence {
                        cluster_size: burst.len(),
                        in_volume,
                        out_volume,
                        start_time: first.timestamp,
                        end_time: last.timestamp,
                        time_span: last.timestamp - first.timestamp,
                    },
                ));
            }
        }

        Ok(findings)
    }
}
