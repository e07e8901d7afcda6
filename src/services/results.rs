use super::auth::Admin;
use crate::db::{self, option::OptionId, poll::PollId};
use crate::error::PollError;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, instrument};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OptionResult {
    pub option_id: OptionId,
    pub option_text: String,
    pub votes: i64,
    pub percentage: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PollResults {
    pub poll_id: PollId,
    pub question: String,
    /// Same order the options were created in
    pub options: Vec<OptionResult>,
    pub total: i64,
}

impl PollResults {
    pub fn labels(&self) -> Vec<String> {
        self.options.iter().map(|o| o.option_text.clone()).collect()
    }

    pub fn data(&self) -> Vec<i64> {
        self.options.iter().map(|o| o.votes).collect()
    }
}

/// Share of each count in percent. All zero when nothing was counted.
pub fn percentages(counts: &[i64]) -> Vec<f64> {
    let total: i64 = counts.iter().sum();
    counts
        .iter()
        .map(|&count| {
            if total > 0 {
                count as f64 / total as f64 * 100.0
            } else {
                0.0
            }
        })
        .collect()
}

#[instrument(skip(pool, _admin))]
pub async fn compute_results(
    pool: &SqlitePool,
    _admin: &Admin,
    poll_id: PollId,
) -> Result<PollResults, PollError> {
    let poll = db::poll::poll_by_id(pool, poll_id)
        .await?
        .ok_or(PollError::NotFound("poll"))?;
    let counts = db::option::vote_counts(pool, poll_id).await?;
    let shares = percentages(&counts.iter().map(|c| c.votes).collect::<Vec<_>>());

    let options: Vec<OptionResult> = counts
        .into_iter()
        .zip(shares)
        .map(|(count, percentage)| OptionResult {
            option_id: count.option_id,
            option_text: count.option_text,
            votes: count.votes,
            percentage,
        })
        .collect();
    let total: i64 = options.iter().map(|o| o.votes).sum();
    debug!(total, "Computed results");

    Ok(PollResults {
        poll_id: poll.id,
        question: poll.question,
        options,
        total,
    })
}

pub const CSV_HEADER: [&str; 5] = ["poll_id", "poll_question", "option_id", "option_text", "votes"];

pub fn export_filename(poll_id: PollId) -> String {
    format!("poll_{}_results.csv", poll_id)
}

/// One row per option, in result order.
pub fn results_csv(results: &PollResults) -> Result<String, PollError> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(CSV_HEADER)?;
    let poll_id = results.poll_id.to_string();
    for option in &results.options {
        writer.write_record([
            poll_id.as_str(),
            results.question.as_str(),
            option.option_id.to_string().as_str(),
            option.option_text.as_str(),
            option.votes.to_string().as_str(),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub async fn export_csv(
    pool: &SqlitePool,
    admin: &Admin,
    poll_id: PollId,
) -> Result<String, PollError> {
    let results = compute_results(pool, admin, poll_id).await?;
    results_csv(&results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentages_all_zero_without_votes() {
        assert_eq!(percentages(&[0, 0, 0]), vec![0.0, 0.0, 0.0]);
        assert!(percentages(&[]).is_empty());
    }

    #[test]
    fn test_percentages_sum_to_hundred() {
        let shares = percentages(&[1, 1, 1]);
        let sum: f64 = shares.iter().sum();
        assert!((sum - 100.0).abs() < 1e-9);
        assert_eq!(percentages(&[3, 1]), vec![75.0, 25.0]);
    }

    #[test]
    fn test_csv_quotes_when_needed() {
        let results = PollResults {
            poll_id: PollId::new(),
            question: "Tabs, spaces or \"both\"?".to_owned(),
            options: vec![OptionResult {
                option_id: OptionId::new(),
                option_text: "Tabs".to_owned(),
                votes: 2,
                percentage: 100.0,
            }],
            total: 2,
        };
        let csv = results_csv(&results).unwrap();
        assert!(csv.ends_with("\r\n"));
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("poll_id,poll_question,option_id,option_text,votes"));
        let row = lines.next().unwrap();
        assert!(row.contains(r#","Tabs, spaces or ""both""?","#));
        assert!(row.ends_with(",Tabs,2"));
        assert_eq!(lines.next(), None);
    }
}
