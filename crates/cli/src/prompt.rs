use std::io::{self, BufRead, StdinLock, Stdout, Write};

/// Presents a list and reports which entry the user picked
pub trait Selector {
    /// Index of the chosen item, or `None` when input has ended
    fn select(&mut self, prompt: &str, items: &[String]) -> io::Result<Option<usize>>;
}

/// Numbered list on a writer, choice read line by line
pub struct LineSelector<R, W> {
    input: R,
    output: W,
}

impl LineSelector<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> LineSelector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Selector for LineSelector<R, W> {
    fn select(&mut self, prompt: &str, items: &[String]) -> io::Result<Option<usize>> {
        if items.is_empty() {
            return Ok(None);
        }

        writeln!(self.output, "{prompt}")?;
        for (i, item) in items.iter().enumerate() {
            writeln!(self.output, "  {:>2}. {}", i + 1, item)?;
        }

        loop {
            write!(self.output, "Select [1-{}]: ", items.len())?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            match line.trim().parse::<usize>() {
                Ok(choice) if (1..=items.len()).contains(&choice) => return Ok(Some(choice - 1)),
                _ => writeln!(
                    self.output,
                    "Please enter a number between 1 and {}",
                    items.len()
                )?,
            }
        }
    }
}
