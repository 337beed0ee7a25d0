use anyhow::{Result, bail};

use crate::chat::ChatService;
use crate::config::Config;
use crate::util::WorkingStatus;

pub async fn run_ask(cfg: Config, prompt: &str) -> Result<()> {
    let service = ChatService::new(cfg);
    let working = WorkingStatus::start("waiting for agent");
    let result = service.reply(prompt).await;
    working.finish();

    match result {
        Ok(reply) => {
            println!("{reply}");
            Ok(())
        }
        Err(e) => bail!("{}", e.user_message()),
    }
}
