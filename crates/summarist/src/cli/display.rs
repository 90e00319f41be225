use colored::*;

use crate::service::SummaryOutcome;

/// Print the heading and the generated text, verbatim
pub fn display_outcome(outcome: &SummaryOutcome) {
  println!("{}", outcome.heading().blue().bold());
  println!();
  println!("{}", outcome.summary());

  match &outcome.save_error {
    None => {
      println!();
      println!("{} Recorded", "✓".green());
    }
    Some(e) => chronicle::warn!("Summary generated but not saved: {e}"),
  }
}
