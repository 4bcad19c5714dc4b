use std::collections::VecDeque;

pub const DEFAULT_LOG_CAPACITY: usize = 15;

/// Bounded list of player-facing messages, newest first.
#[derive(Debug, Clone)]
pub struct GameLog {
    lines: VecDeque<String>,
    capacity: usize,
}

impl Default for GameLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}

impl GameLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        self.lines.push_front(line.into());
        self.lines.truncate(self.capacity);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn latest(&self) -> Option<&str> {
        self.lines.front().map(String::as_str)
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_newest_lines_up_to_capacity() {
        let mut log = GameLog::default();
        for i in 0..40 {
            log.push(format!("line {i}"));
            assert!(log.len() <= DEFAULT_LOG_CAPACITY);
            assert_eq!(log.latest(), Some(format!("line {i}").as_str()));
        }
        assert_eq!(log.len(), DEFAULT_LOG_CAPACITY);
        assert_eq!(log.lines().last(), Some("line 25"));
    }
}
