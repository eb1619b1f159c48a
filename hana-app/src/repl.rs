//! Terminal front end: reads user text, routes it through the agent,
//! and walks the confirmation protocol for risky actions.

use crate::config::Config;
use hana_core::persona::{style_reply, MoodEngine, PersonaEvent};
use hana_core::{Agent, AgentEvent};
use hana_executor::{Executor, Outcome};
use std::io::{self, Write};

pub struct Repl {
    agent: Agent,
    executor: Executor,
    config: Config,
    mood: MoodEngine,
}

impl Repl {
    pub fn new(agent: Agent, executor: Executor, config: Config) -> Self {
        Self {
            agent,
            executor,
            config,
            mood: MoodEngine::new(),
        }
    }

    pub async fn run(&mut self) -> io::Result<()> {
        println!("Hana - desktop assistant");
        println!("Commands: exit, help, key, model <id>, log");
        println!();

        loop {
            print!("hana> ");
            io::stdout().flush()?;

            let mut input = String::new();
            if io::stdin().read_line(&mut input)? == 0 {
                break;
            }
            let input = input.trim();
            if input.is_empty() {
                continue;
            }

            match input {
                "exit" | "quit" => break,
                "help" => {
                    println!("  exit, quit   - leave");
                    println!("  key          - set the OpenRouter API key");
                    println!("  model <id>   - set the preferred model");
                    println!("  log          - show recent action log entries");
                    continue;
                }
                "key" => {
                    self.prompt_api_key();
                    continue;
                }
                "log" => {
                    self.print_log();
                    continue;
                }
                _ => {}
            }

            if let Some(model) = input.strip_prefix("model ") {
                match self.config.set_model(model.trim()) {
                    Ok(()) => {
                        self.agent.set_model(model.trim().to_string());
                        println!("model set to {}", model.trim());
                    }
                    Err(e) => eprintln!("could not save model: {e}"),
                }
                continue;
            }

            self.mood
                .apply_event(PersonaEvent::UserInput, chrono::Local::now());
            let event = self.agent.process_text(input).await;
            self.handle_event(event).await?;
        }

        Ok(())
    }

    async fn handle_event(&mut self, event: AgentEvent) -> io::Result<()> {
        match event {
            AgentEvent::Reply { message } => {
                println!("{}", style_reply(&message, self.mood.current()));
            }
            AgentEvent::Action {
                name,
                args,
                message,
            } => {
                if !message.is_empty() {
                    println!("{}", style_reply(&message, self.mood.current()));
                }
                let outcome = self.executor.execute(&name, &args).await;
                self.handle_outcome(outcome).await?;
            }
        }
        Ok(())
    }

    async fn handle_outcome(&mut self, outcome: Outcome) -> io::Result<()> {
        match outcome {
            Outcome::Success { result, .. } => {
                println!("done: {result}");
            }
            Outcome::Denied { message } => {
                println!("denied: {message}");
            }
            Outcome::Error { message } => {
                println!("failed: {message}");
            }
            Outcome::NeedsConfirmation { token, message } => {
                print!("{message} Proceed? [y/N] ");
                io::stdout().flush()?;
                let mut answer = String::new();
                io::stdin().read_line(&mut answer)?;
                if answer.trim().eq_ignore_ascii_case("y") {
                    let confirmed = self.executor.confirm(token).await;
                    // One level deep only: a confirmed action cannot
                    // ask for confirmation again.
                    match confirmed {
                        Outcome::Success { result, .. } => println!("done: {result}"),
                        Outcome::Denied { message } => println!("denied: {message}"),
                        Outcome::Error { message } => println!("failed: {message}"),
                        Outcome::NeedsConfirmation { .. } => println!("failed: unexpected state"),
                    }
                } else {
                    self.executor.cancel(token);
                    println!("cancelled.");
                }
            }
        }
        Ok(())
    }

    fn prompt_api_key(&mut self) {
        match rpassword::prompt_password("OpenRouter API key: ") {
            Ok(key) => {
                let key = key.trim().to_string();
                if key.is_empty() {
                    println!("no key entered.");
                    return;
                }
                match self.config.set_api_key(&key) {
                    Ok(()) => {
                        self.agent.set_api_key(key);
                        println!("key saved.");
                    }
                    Err(e) => eprintln!("could not save key: {e}"),
                }
            }
            Err(e) => eprintln!("could not read key: {e}"),
        }
    }

    fn print_log(&self) {
        match self.executor.audit_log().recent(10) {
            Ok(entries) if entries.is_empty() => println!("no actions logged yet."),
            Ok(entries) => {
                for entry in entries {
                    println!(
                        "#{} {} {} [{}] {}",
                        entry.id, entry.timestamp, entry.action, entry.status, entry.message
                    );
                }
            }
            Err(e) => eprintln!("could not read log: {e}"),
        }
    }
}
