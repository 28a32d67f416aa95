//! The `quizline init` command.

use std::path::Path;

use anyhow::{Context, Result};

pub fn execute() -> Result<()> {
    write_if_absent(Path::new("quizline.toml"), &quizline_core::config::sample_config())?;
    write_if_absent(Path::new("questions.json"), EXAMPLE_BANK)?;

    println!("\nNext steps:");
    println!("  1. Edit questions.json with your own questions");
    println!("  2. Run: quizline validate");
    println!("  3. Run: quizline user register --username <name> --password <password>");
    println!("  4. Run: quizline take --username <name> --password <password> --roll 1 --name <name> --class <class> --subject Physics");

    Ok(())
}

fn write_if_absent(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const EXAMPLE_BANK: &str = r#"[
  {
    "subject": "Physics",
    "question": "What is the SI unit of force?",
    "options": ["Joule", "Newton", "Watt", "Pascal"],
    "answer": "Newton",
    "explanation": "One newton accelerates one kilogram at one metre per second squared."
  },
  {
    "subject": "Physics",
    "question": "Which quantity is conserved in an elastic collision but not in an inelastic one?",
    "options": ["Momentum", "Mass", "Kinetic energy", "Charge"],
    "answer": "Kinetic energy",
    "explanation": "Momentum is conserved in both; kinetic energy only in elastic collisions."
  },
  {
    "subject": "Chemistry",
    "question": "What is the chemical symbol for sodium?",
    "options": ["S", "So", "Na", "Sd"],
    "answer": "Na",
    "explanation": "From the Latin name natrium."
  },
  {
    "subject": "Chemistry",
    "question": "What is the pH of pure water at 25 C?",
    "options": ["5", "7", "9", "14"],
    "answer": "7"
  },
  {
    "subject": "Biology",
    "question": "Which organelle produces most of a cell's ATP?",
    "options": ["Nucleus", "Ribosome", "Mitochondrion", "Golgi apparatus"],
    "answer": "Mitochondrion",
    "explanation": "Oxidative phosphorylation happens in the inner mitochondrial membrane."
  }
]
"#;
