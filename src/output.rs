use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::models::{UnifiedEvent, ValueBet, ValueBetRecord};

/// Writes scrape snapshots and analysis results under one output
/// directory: `<provider>.json` per book, `value_bets.json` and
/// `value_bets.csv` for the report.
pub struct OutputManager {
    output_dir: PathBuf,
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

impl OutputManager {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)
            .with_context(|| format!("Failed to create output dir {}", output_dir.display()))?;
        Ok(OutputManager { output_dir })
    }

    fn write_json(&self, filename: &str, data: &impl serde::Serialize) -> Result<()> {
        let path = self.output_dir.join(filename);
        let body = serde_json::to_string_pretty(data)?;
        fs::write(&path, body).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn save_events(&self, provider: &str, events: &[UnifiedEvent]) -> Result<()> {
        self.write_json(&format!("{provider}.json"), &events)
    }

    pub fn save_value_bets_json(&self, value_bets: &[ValueBet]) -> Result<()> {
        let records: Vec<ValueBetRecord> = value_bets.iter().map(ValueBetRecord::from).collect();
        self.write_json("value_bets.json", &records)
    }

    pub fn save_value_bets_csv(&self, value_bets: &[ValueBet]) -> Result<()> {
        let path = self.output_dir.join("value_bets.csv");
        let mut file = fs::File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;

        writeln!(
            file,
            "League,Kickoff,Home,Away,Bookmaker,Market,Outcome,\
             Soft Odds,Anchor Odds,Edge %,Recommended Stake,Expected Value"
        )?;
        for bet in value_bets {
            writeln!(
                file,
                "{},{},{},{},{},{},{},{:.3},{:.3},{:.2},{:.2},{:.2}",
                csv_field(&bet.league),
                csv_field(&bet.kickoff),
                csv_field(&bet.home),
                csv_field(&bet.away),
                csv_field(&bet.bookmaker),
                csv_field(&bet.market),
                csv_field(&bet.outcome),
                bet.soft_odds,
                bet.anchor_odds,
                bet.edge_percentage,
                bet.recommended_stake,
                bet.expected_value,
            )?;
        }
        Ok(())
    }

    /// Console report of the best opportunities, highest edge first.
    pub fn print_summary(&self, value_bets: &[ValueBet], top_n: usize) {
        println!("\n{}", "=".repeat(100));
        println!("TOP {top_n} VALUE BETS");
        println!("{}", "=".repeat(100));

        for (i, bet) in value_bets.iter().take(top_n).enumerate() {
            println!("\n{}. {} vs {}", i + 1, bet.home, bet.away);
            println!(
                "   League: {} | Bookmaker: {}",
                bet.league,
                bet.bookmaker.to_uppercase()
            );
            println!(
                "   Market: {} | Outcome: {}",
                bet.market.to_uppercase(),
                bet.outcome
            );
            println!(
                "   Soft Odds: {:.3} | Anchor Odds: {:.3}",
                bet.soft_odds, bet.anchor_odds
            );
            println!(
                "   Edge: {:.2}% | Recommended Stake: \u{20ac}{:.2}",
                bet.edge_percentage, bet.recommended_stake
            );
            println!("   Expected Value: \u{20ac}{:.2}", bet.expected_value);
        }

        println!("\n{}", "=".repeat(100));
    }
}
