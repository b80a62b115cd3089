//! Partisan lean classification from two-party vote shares.

use crate::model::{CountyElectionData, ElectionResult, PoliticalLean};

/// How many of the most recent elections feed a lean classification.
pub const DEFAULT_RECENT_ELECTIONS: usize = 3;

// Sums Democratic and Republican votes over a set of elections. Party
// matching is by uppercased substring, so fusion labels such as
// DEMOCRATIC-FARMER-LABOR count toward the Democratic column. Everything
// else (third parties, write-ins) stays out of the two-party total.
fn tally_major_parties(elections: &[&ElectionResult]) -> (u64, u64) {
    let mut dem_votes: u64 = 0;
    let mut rep_votes: u64 = 0;
    for election in elections {
        for candidate in &election.candidates {
            let party = candidate.party.to_ascii_uppercase();
            if party.contains("DEMOCRAT") {
                dem_votes += candidate.votes;
            } else if party.contains("REPUBLICAN") {
                rep_votes += candidate.votes;
            }
        }
    }
    (dem_votes, rep_votes)
}

// The five-point cascade. Branch order matters: the strict > at 0.60
// sends an exact 60/40 split to the plain lean, not the strong one,
// and the 5-point margin check only runs once both shares are at or
// below 0.55.
fn classify_two_party(dem_votes: u64, rep_votes: u64) -> PoliticalLean {
    let total = dem_votes + rep_votes;
    if total == 0 {
        return PoliticalLean::Swing;
    }
    let dem_share = dem_votes as f64 / total as f64;
    let rep_share = rep_votes as f64 / total as f64;
    if dem_share > 0.60 {
        PoliticalLean::StronglyDemocratic
    } else if dem_share > 0.55 {
        PoliticalLean::Democratic
    } else if rep_share > 0.60 {
        PoliticalLean::StronglyRepublican
    } else if rep_share > 0.55 {
        PoliticalLean::Republican
    } else if (dem_share - rep_share).abs() < 0.05 {
        PoliticalLean::Swing
    } else if dem_share > rep_share {
        PoliticalLean::Democratic
    } else {
        PoliticalLean::Republican
    }
}

/// Classifies a county's lean from its most recent elections.
///
/// `elections` must already be sorted by year descending, which is how
/// the parser hands them out; the first `recent_elections` entries are
/// pooled. Only the two-party total matters, and a county with no
/// Democratic or Republican votes at all reads as swing.
///
/// This is a pure function of its inputs.
pub fn calculate_political_lean(
    elections: &[ElectionResult],
    recent_elections: usize,
) -> PoliticalLean {
    let recent: Vec<&ElectionResult> = elections.iter().take(recent_elections).collect();
    let (dem_votes, rep_votes) = tally_major_parties(&recent);
    classify_two_party(dem_votes, rep_votes)
}

/// Classifies a state's lean by pooling every county's results from the
/// state's most recent election years.
///
/// The year cutoff is applied statewide: the distinct years across all
/// counties are sorted descending and the newest `recent_elections` of
/// them are kept, so a county that sat out the latest cycle still
/// contributes its older results when those years make the cut.
pub fn calculate_state_lean(
    counties: &[&CountyElectionData],
    recent_elections: usize,
) -> PoliticalLean {
    let mut years: Vec<u32> = counties
        .iter()
        .flat_map(|c| c.elections.iter().map(|e| e.year))
        .collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years.truncate(recent_elections);

    let pool: Vec<&ElectionResult> = counties
        .iter()
        .flat_map(|c| c.elections.iter())
        .filter(|e| years.contains(&e.year))
        .collect();
    let (dem_votes, rep_votes) = tally_major_parties(&pool);
    classify_two_party(dem_votes, rep_votes)
}
