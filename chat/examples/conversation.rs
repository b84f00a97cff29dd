//! Interactive conversation over a summary-buffer memory.
//!
//! Reads user input from stdin until EOF. Requires OPENAI_API_KEY; model and
//! base url are overridable via CHAT_MODEL and CHAT_BASE_URL.
//!
//! ```text
//! OPENAI_API_KEY=sk-... cargo run --example conversation
//! ```

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use chat::{ChatClient, ConversationChain, LlmSummarizer, OpenAiChatClient};
use memory::{BoundingPolicy, ConversationMemory, HeuristicTokenEstimator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dialog_core::init_tracing("conversation.log")?;

    let api_key = std::env::var("OPENAI_API_KEY")?;
    let model = std::env::var("CHAT_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

    let client: Arc<dyn ChatClient> = match std::env::var("CHAT_BASE_URL") {
        Ok(base_url) => Arc::new(OpenAiChatClient::with_base_url(api_key, base_url, model)),
        Err(_) => Arc::new(OpenAiChatClient::new(api_key, model)),
    };

    let memory =
        ConversationMemory::builder(BoundingPolicy::SummaryBuffer { max_token_limit: 2000 })
            .with_estimator(Arc::new(HeuristicTokenEstimator::new()))
            .with_summarizer(Arc::new(LlmSummarizer::new(client.clone())))
            .build()?;

    let mut chain = ConversationChain::new(client, memory)
        .with_system_message("You are a helpful assistant.");

    let stdin = io::stdin();
    print!("> ");
    io::stdout().flush()?;

    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let reply = chain.send(input).await?;
        println!("{reply}");

        let stats = chain.memory().stats();
        if stats.degraded_appends > 0 {
            eprintln!("(note: {} degraded appends so far)", stats.degraded_appends);
        }

        print!("> ");
        io::stdout().flush()?;
    }

    Ok(())
}
