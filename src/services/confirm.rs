use std::io::{self, BufRead, Write};

/// Gate in front of a destructive operation
pub trait Confirmer {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool>;
}

/// `y` or `yes` in any case; anything else is a refusal
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

/// Prints the prompt and reads one answer line from standard input
pub struct StdinConfirmer;

impl Confirmer for StdinConfirmer {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        let mut stdout = io::stdout();
        writeln!(stdout, "{prompt}")?;
        writeln!(stdout, "Are you sure? (y/n)")?;
        stdout.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(is_affirmative(&answer))
    }
}

/// Confirmation already given up front (e.g. `--yes`)
pub struct AssumeYes;

impl Confirmer for AssumeYes {
    fn confirm(&mut self, _prompt: &str) -> io::Result<bool> {
        Ok(true)
    }
}

impl<F> Confirmer for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        Ok(self(prompt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affirmative_answers() {
        for answer in ["y", "Y", "yes", "YES", "Yes", "  y\n", "yes\r\n"] {
            assert!(is_affirmative(answer), "{answer:?} should confirm");
        }
    }

    #[test]
    fn test_other_answers_refuse() {
        for answer in ["", "n", "no", "N", "yep", "ye", "y e s", "sure"] {
            assert!(!is_affirmative(answer), "{answer:?} should refuse");
        }
    }

    #[test]
    fn test_closure_confirmer_sees_prompt() {
        let mut seen = String::new();
        let mut confirmer = |prompt: &str| {
            seen = prompt.to_string();
            false
        };
        assert!(!confirmer.confirm("Delete it all?").unwrap());
        assert_eq!(seen, "Delete it all?");
    }

    #[test]
    fn test_assume_yes() {
        assert!(AssumeYes.confirm("anything").unwrap());
    }
}
