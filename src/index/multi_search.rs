use crate::index::cluster::ClusterId;
use crate::index::term_index::TermIndex;
use crate::models::Entry;

/// A candidate at or above this confidence is accepted immediately, without
/// evaluating the remaining clusters. Deliberate latency/precision
/// trade-off for the obviously-correct case.
pub const ACCEPT_CONFIDENCE: f64 = 0.9;

/// A candidate at or below this confidence is discarded outright as too
/// ambiguous to trust across categories.
pub const REJECT_CONFIDENCE: f64 = 0.80;

#[derive(Debug, PartialEq, Eq)]
enum Verdict {
    Accept,
    Reject,
    Consider,
}

fn classify(confidence: f64) -> Verdict {
    if confidence >= ACCEPT_CONFIDENCE {
        Verdict::Accept
    } else if confidence <= REJECT_CONFIDENCE {
        Verdict::Reject
    } else {
        Verdict::Consider
    }
}

/// Search an ordered list of candidate clusters for `query`.
///
/// Sentinel clusters are dropped first. An empty list yields an absent
/// entry and a single cluster delegates directly to its correction index.
/// With two or more clusters, candidates in the ambiguous band between the
/// thresholds are kept as a running best (earlier clusters win ties) and
/// returned only if no later cluster reaches the accept threshold.
pub(crate) fn search_clusters(index: &TermIndex, clusters: &[ClusterId], query: &str) -> Entry {
    let debug_mode = std::env::var("DEBUG").unwrap_or_default() == "1";

    let live: Vec<ClusterId> = clusters
        .iter()
        .copied()
        .filter(|id| index.cluster_participates(*id))
        .collect();

    match live.len() {
        0 => return Entry::absent(),
        1 => return index.search_cluster(live[0], query),
        _ => {}
    }

    let mut best: Option<(ClusterId, String, f64)> = None;
    for id in live {
        let correction = index.correct_in_cluster(id, query);
        let Some(term) = correction.term else {
            continue;
        };
        let confidence = correction.confidence;
        if debug_mode {
            println!(
                "DEBUG: Cluster {:?} candidate '{term}' at {confidence:.3}",
                index.cluster_category(id)
            );
        }
        match classify(confidence) {
            Verdict::Accept => return index.entry_for(id, &term),
            Verdict::Reject => continue,
            Verdict::Consider => {
                let better = match &best {
                    Some((_, _, best_confidence)) => confidence > *best_confidence,
                    None => true,
                };
                if better {
                    best = Some((id, term, confidence));
                }
            }
        }
    }

    match best {
        Some((id, term, _)) => index.entry_for(id, &term),
        None => Entry::absent(),
    }
}
