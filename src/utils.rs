use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use ureq::{Agent, AgentBuilder};

pub fn progress_bar(len: u64) -> ProgressBar {
    ProgressBar::new(len).with_style(
        ProgressStyle::with_template("[{elapsed_precise}] {wide_bar} {pos}/{len} regions")
            .expect("hardcoded"),
    )
}

pub fn agent(user_agent: &str, timeout: Duration) -> Agent {
    AgentBuilder::new()
        .user_agent(user_agent)
        .timeout_connect(timeout)
        .build()
}
