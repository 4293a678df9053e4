//! Opportunity Matrix
//!
//! Places one (challenge, potential) point on a 0–10 grid. Scores come from
//! the caller; nothing here derives them from generated text.

use serde::Serialize;

use crate::constants::matrix::SCALE_MAX;
use crate::types::{ForgeError, Result};

const X_LABEL: &str = "Challenges (lower is better)";
const Y_LABEL: &str = "Market potential (higher is better)";
const POINT: char = '●';

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OpportunityMatrix {
    /// Market potential, 0–10, higher is better
    pub potential: f32,
    /// Challenge level, 0–10, lower is better
    pub challenge: f32,
}

impl OpportunityMatrix {
    pub fn new(potential: f32, challenge: f32) -> Result<Self> {
        check_score("potential", potential)?;
        check_score("challenge", challenge)?;
        Ok(Self {
            potential,
            challenge,
        })
    }

    /// Grid cell holding the point, as (column, row) on the 0–10 axes
    pub fn cell(&self) -> (usize, usize) {
        (
            self.challenge.round() as usize,
            self.potential.round() as usize,
        )
    }

    /// Render as a character plot
    pub fn render(&self) -> String {
        let max = SCALE_MAX as usize;
        let (px, py) = self.cell();
        let mut out = String::new();

        out.push_str(&format!("    {}\n", Y_LABEL));
        for y in (0..=max).rev() {
            let mut line = format!("{:>3} |", y);
            for x in 0..=max {
                line.push(if (x, y) == (px, py) { POINT } else { ' ' });
                line.push(' ');
            }
            if y == py {
                line.push_str(&format!(
                    "Opportunity ({:.1}, {:.1})",
                    self.challenge, self.potential
                ));
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out.push_str(&format!("    +{}\n", "-".repeat(2 * (max + 1))));
        let ticks: Vec<String> = (0..=max).map(|x| x.to_string()).collect();
        out.push_str(&format!("     {}\n", ticks.join(" ")));
        out.push_str(&format!("     {}\n", X_LABEL));
        out
    }
}

fn check_score(name: &str, value: f32) -> Result<()> {
    if !value.is_finite() || !(0.0..=SCALE_MAX).contains(&value) {
        return Err(ForgeError::Validation(format!(
            "{} score must be between 0 and {}, got {}",
            name, SCALE_MAX, value
        )));
    }
    Ok(())
}
