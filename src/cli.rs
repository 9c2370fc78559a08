//! CLI front end: stdin/stdout REPL that renders the current screen and
//! turns typed commands into onboarding intents.

use std::str::FromStr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::error;

use crate::error::{Error, OnboardingError};
use crate::i18n::{self, Language};
use crate::onboarding::catalog::MAX_RATING;
use crate::onboarding::{
    CompletionHandle, NavEvent, Navigation, OnboardingController, Screen, ScreenSequencer,
};
use crate::preferences::{LocaleStore, PreferenceManager};

const PROGRESS_WIDTH: usize = 20;

/// Results of background completion writes, in the order they settle.
pub type CompletionResults = mpsc::UnboundedReceiver<Result<(), OnboardingError>>;

/// A parsed REPL command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Show,
    Nav(NavEvent),
    /// Leave the flow without finishing it.
    Exit,
    Skill(String),
    Goal(String),
    Topic(String),
    /// Switch language; the code is validated when executed.
    Lang(String),
    /// Re-issue a completion write that failed.
    Retry,
    /// Clear the completion flag (development aid).
    Reset,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let name = parts.next().unwrap_or("show").to_ascii_lowercase();
        let arg = parts.next();

        let required = |usage: &str| -> Result<String, String> {
            arg.map(str::to_string)
                .ok_or_else(|| format!("usage: {usage}"))
        };

        match name.as_str() {
            "help" | "?" => Ok(Self::Help),
            "show" => Ok(Self::Show),
            "start" => Ok(Self::Nav(NavEvent::Start)),
            "continue" | "next" | "c" => Ok(Self::Nav(NavEvent::Continue)),
            "back" | "b" => Ok(Self::Nav(NavEvent::Back)),
            "exit" => Ok(Self::Exit),
            "skill" => required("skill <id>").map(Self::Skill),
            "goal" => required("goal <id>").map(Self::Goal),
            "topic" => required("topic <id>").map(Self::Topic),
            "lang" => required("lang <en|es>").map(Self::Lang),
            "retry" => Ok(Self::Retry),
            "reset" => Ok(Self::Reset),
            "quit" | "q" => Ok(Self::Quit),
            other => Err(format!("unknown command '{other}' (type 'help')")),
        }
    }
}

const HELP: &str = "\
Commands:
  start               begin onboarding from home
  skill <id>          choose a skill (skill step)
  goal <id>           choose a daily goal (goal step)
  topic <id>          toggle a topic (topics step)
  continue | back     move through the steps
  exit                leave onboarding without finishing
  lang <en|es>        switch language
  retry               re-save a completion that failed
  reset               clear the completion flag
  show | help | quit";

/// Owns one onboarding session and the preferences it reads.
pub struct App {
    controller: OnboardingController,
    sequencer: ScreenSequencer,
    prefs: Arc<PreferenceManager>,
    locale: LocaleStore,
    completions: mpsc::UnboundedSender<Result<(), OnboardingError>>,
    last_completion_failed: bool,
}

impl App {
    /// Build the app on the screen the committed flag selects.
    pub fn new(prefs: Arc<PreferenceManager>, locale: LocaleStore) -> (Self, CompletionResults) {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = Self {
            controller: OnboardingController::new(Arc::clone(&prefs)),
            sequencer: ScreenSequencer::for_launch(&prefs),
            prefs,
            locale,
            completions: tx,
            last_completion_failed: false,
        };
        (app, rx)
    }

    pub fn controller(&self) -> &OnboardingController {
        &self.controller
    }

    pub fn sequencer(&self) -> &ScreenSequencer {
        &self.sequencer
    }

    /// Run one command. Returns the text to print, or `None` to quit.
    pub async fn execute(&mut self, command: Command) -> Result<Option<String>, Error> {
        let screen = self.sequencer.current();
        let output = match command {
            Command::Help => HELP.to_string(),
            Command::Show => self.render(),
            Command::Nav(event) => match self.sequencer.handle(event, &self.controller)? {
                Navigation::Moved { .. } => self.render(),
                Navigation::Completed { completion } => {
                    self.watch_completion(completion);
                    self.render()
                }
                Navigation::Blocked { .. } => "Choose an option before continuing.".to_string(),
                Navigation::Ignored { event, .. } => format!("'{event}' is not available here."),
            },
            Command::Exit => {
                if self.sequencer.abandon(&self.controller) {
                    self.render()
                } else {
                    "Already on home.".to_string()
                }
            }
            Command::Skill(id) => {
                self.require_screen(Screen::SkillStep)?;
                self.controller.select_skill(&id)?;
                self.render()
            }
            Command::Goal(id) => {
                self.require_screen(Screen::GoalStep)?;
                self.controller.select_goal(&id)?;
                self.render()
            }
            Command::Topic(id) => {
                self.require_screen(Screen::TopicsStep)?;
                self.controller.toggle_topic(&id)?;
                self.render()
            }
            Command::Lang(code) => {
                let language = code.parse::<Language>()?;
                self.locale.set_language(language).await?;
                self.render()
            }
            Command::Retry => {
                if self.last_completion_failed && !self.prefs.is_onboarding_completed() {
                    let completion = self.controller.complete_onboarding()?;
                    self.watch_completion(completion);
                    "Saving your progress again...".to_string()
                } else {
                    "Nothing to retry.".to_string()
                }
            }
            Command::Reset => {
                self.prefs.clear_onboarding_completed().await?;
                format!("Onboarding flag cleared (on {screen}).")
            }
            Command::Quit => return Ok(None),
        };
        Ok(Some(output))
    }

    /// Record the outcome of a background completion write.
    pub fn on_completion(&mut self, result: Result<(), OnboardingError>) -> String {
        match result {
            Ok(()) => {
                self.last_completion_failed = false;
                "Progress saved.".to_string()
            }
            Err(e) => {
                self.last_completion_failed = true;
                error!(error = %e, "Onboarding completion was not saved");
                format!("Could not save your progress: {e}. Type 'retry' to try again.")
            }
        }
    }

    /// Render the current screen in the active language.
    pub fn render(&self) -> String {
        let lang = self.locale.language();
        let t = |key: &'static str| i18n::translate(key, lang);
        let screen = self.sequencer.current();
        let selection = self.controller.selection();

        let mut parts = vec![format!("== {} ==", t(screen.title_key()))];
        if let Some(progress) = screen.progress() {
            parts.push(progress_bar(progress));
        }

        match screen {
            Screen::Home => {
                if self.prefs.is_onboarding_completed() {
                    parts.push(t("home_onboarding_done").to_string());
                } else {
                    parts.push(format!("[start] {}", t("home_start_onboarding")));
                }
                let options: Vec<String> = Language::ALL
                    .iter()
                    .map(|l| {
                        if *l == lang {
                            format!("({l})")
                        } else {
                            l.to_string()
                        }
                    })
                    .collect();
                parts.push(format!("{}: {}", t("home_language"), options.join(" ")));
            }
            Screen::SkillStep => {
                for skill in self.controller.skills() {
                    let mark = radio(selection.selected_skill_id() == Some(skill.id));
                    parts.push(format!(
                        "{mark} {} {} ({})",
                        skill.icon,
                        t(skill.display_key),
                        skill.id
                    ));
                }
            }
            Screen::GoalStep => {
                for goal in self.controller.goals() {
                    let mark = radio(selection.selected_goal_id() == Some(goal.id));
                    parts.push(format!("{mark} {} ({})", t(goal.display_key), goal.id));
                }
            }
            Screen::ReviewStep => {
                for review in self.controller.reviews() {
                    let lead = if review.highlighted { ">" } else { " " };
                    let stars = format!(
                        "{}{}",
                        "★".repeat(review.rating as usize),
                        "☆".repeat(MAX_RATING.saturating_sub(review.rating) as usize)
                    );
                    parts.push(format!(
                        "{lead} {stars} {}: {}",
                        review.user_name,
                        t(review.comment_key)
                    ));
                }
            }
            Screen::TopicsStep => {
                for topic in self.controller.topics() {
                    let mark = if selection.is_topic_selected(topic.id) {
                        "[x]"
                    } else {
                        "[ ]"
                    };
                    parts.push(format!("{mark} {} ({})", t(topic.display_key), topic.id));
                }
            }
        }

        if screen.is_onboarding() {
            let back = if screen.previous().is_some() {
                format!("[back] {}", t("button_back"))
            } else {
                String::new()
            };
            let cont = if self.controller.can_continue_from(screen) {
                format!("[continue] {}", t("button_continue"))
            } else {
                format!("(continue) {}", t("button_continue"))
            };
            parts.push(format!("{back}  {cont}").trim().to_string());
        }

        parts.join("\n")
    }

    /// Read commands from stdin until EOF or `quit`.
    ///
    /// A completion write still pending at exit is awaited so it can commit.
    pub async fn run(mut self, mut completions: CompletionResults) -> Result<(), Error> {
        let stdin = tokio::io::stdin();
        let mut lines = BufReader::new(stdin).lines();

        println!("{}\n", self.render());
        eprint!("> ");

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let line = match line {
                        Ok(Some(line)) => line,
                        Ok(None) => break, // EOF
                        Err(e) => {
                            error!("Error reading stdin: {}", e);
                            break;
                        }
                    };
                    match line.trim().parse::<Command>() {
                        Ok(command) => match self.execute(command).await {
                            Ok(Some(output)) => println!("\n{output}\n"),
                            Ok(None) => break,
                            Err(e) => println!("\n! {e}\n"),
                        },
                        Err(msg) => println!("{msg}"),
                    }
                    eprint!("> ");
                }
                Some(result) = completions.recv() => {
                    println!("\n{}\n", self.on_completion(result));
                    eprint!("> ");
                }
            }
        }

        if self.controller.is_completion_in_flight() {
            if let Some(result) = completions.recv().await {
                println!("{}", self.on_completion(result));
            }
        }
        Ok(())
    }

    fn watch_completion(&self, completion: CompletionHandle) {
        let tx = self.completions.clone();
        tokio::spawn(async move {
            let result = completion.wait().await;
            // Receiver gone means the app already exited
            let _ = tx.send(result);
        });
    }

    fn require_screen(&self, expected: Screen) -> Result<(), OnboardingError> {
        let current = self.sequencer.current();
        if current == expected {
            Ok(())
        } else {
            Err(OnboardingError::WrongScreen { expected, current })
        }
    }
}

fn radio(selected: bool) -> &'static str {
    if selected { "(*)" } else { "( )" }
}

fn progress_bar(progress: f32) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * PROGRESS_WIDTH as f32).round()) as usize;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(PROGRESS_WIDTH - filled),
        (progress * 100.0).round() as u32
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::store::{Database, LibSqlBackend};

    async fn test_app() -> (App, CompletionResults, Arc<PreferenceManager>) {
        let db: Arc<dyn Database> = Arc::new(LibSqlBackend::new_memory().await.unwrap());
        let prefs = Arc::new(
            PreferenceManager::load(Arc::clone(&db), "default")
                .await
                .unwrap(),
        );
        let locale = LocaleStore::load(db, "default", Language::English)
            .await
            .unwrap();
        let (app, rx) = App::new(Arc::clone(&prefs), locale);
        (app, rx, prefs)
    }

    async fn run(app: &mut App, line: &str) -> String {
        let command: Command = line.parse().unwrap();
        app.execute(command).await.unwrap().unwrap()
    }

    #[test]
    fn parse_commands() {
        assert_eq!("".parse::<Command>().unwrap(), Command::Show);
        assert_eq!("Next".parse::<Command>().unwrap(), Command::Nav(NavEvent::Continue));
        assert_eq!(
            "skill vocabulary".parse::<Command>().unwrap(),
            Command::Skill("vocabulary".into())
        );
        assert_eq!(
            "lang es".parse::<Command>().unwrap(),
            Command::Lang("es".into())
        );
        assert_eq!("topic".parse::<Command>().unwrap_err(), "usage: topic <id>");
        assert!("lang".parse::<Command>().is_err());
        assert!("dance".parse::<Command>().is_err());
    }

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(0.25), "[#####---------------]  25%");
        assert_eq!(progress_bar(0.9), "[##################--]  90%");
    }

    #[tokio::test]
    async fn first_launch_opens_skill_step() {
        let (app, _rx, _) = test_app().await;
        assert_eq!(app.sequencer().current(), Screen::SkillStep);
        let screen = app.render();
        assert!(screen.contains("Which skill"));
        assert!(screen.contains("(continue)"));
        assert!(!screen.contains("[back]"));
    }

    #[tokio::test]
    async fn walks_the_whole_flow() {
        let (mut app, mut rx, prefs) = test_app().await;

        assert_eq!(run(&mut app, "continue").await, "Choose an option before continuing.");
        let out = run(&mut app, "skill vocabulary").await;
        assert!(out.contains("(*) \u{1F4D6} Vocabulary"));
        assert!(out.contains("[continue]"));

        run(&mut app, "continue").await;
        run(&mut app, "goal 10_min").await;
        let out = run(&mut app, "continue").await;
        assert!(out.contains("> ★★★★★ @safi.hana"));

        let out = run(&mut app, "continue").await;
        assert!(out.contains("[ ] Travel (travel)"));
        let out = run(&mut app, "topic travel").await;
        assert!(out.contains("[x] Travel (travel)"));

        run(&mut app, "continue").await;
        assert_eq!(app.sequencer().current(), Screen::Home);

        let notice = app.on_completion(rx.recv().await.unwrap());
        assert_eq!(notice, "Progress saved.");
        assert!(prefs.is_onboarding_completed());
        assert!(app.render().contains("You're all set"));
    }

    #[tokio::test]
    async fn selection_on_wrong_screen_is_rejected() {
        let (mut app, _rx, _) = test_app().await;
        let err = app
            .execute(Command::Topic("airport".into()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Onboarding(OnboardingError::WrongScreen {
                expected: Screen::TopicsStep,
                current: Screen::SkillStep
            })
        ));
    }

    #[tokio::test]
    async fn unknown_id_is_reported() {
        let (mut app, _rx, _) = test_app().await;
        let err = app
            .execute(Command::Skill("cooking".into()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("cooking"));
    }

    #[tokio::test]
    async fn language_switch_rerenders() {
        let (mut app, _rx, _) = test_app().await;
        let out = run(&mut app, "lang es").await;
        assert!(out.contains("¿Qué habilidad"));
        assert!(out.contains("Vocabulario"));
        // Selection is untouched by the switch
        assert!(app.controller().selection().selected_skill_id().is_none());
    }

    #[tokio::test]
    async fn unsupported_language_is_a_config_error() {
        let (mut app, _rx, _) = test_app().await;
        let err = app.execute(Command::Lang("fr".into())).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue { ref key, .. }) if key == "language"
        ));
        assert!(err.to_string().contains("'fr'"));
    }

    #[tokio::test]
    async fn reset_during_pending_completion_matches_store() {
        let db: Arc<dyn Database> = Arc::new(LibSqlBackend::new_memory().await.unwrap());
        let prefs = Arc::new(
            PreferenceManager::load(Arc::clone(&db), "default")
                .await
                .unwrap(),
        );
        let locale = LocaleStore::load(Arc::clone(&db), "default", Language::English)
            .await
            .unwrap();
        let (mut app, mut rx) = App::new(Arc::clone(&prefs), locale);

        run(&mut app, "skill reading").await;
        run(&mut app, "continue").await;
        run(&mut app, "goal 5_min").await;
        run(&mut app, "continue").await;
        run(&mut app, "continue").await;
        run(&mut app, "topic restaurant").await;
        run(&mut app, "continue").await;
        assert_eq!(app.sequencer().current(), Screen::Home);

        run(&mut app, "reset").await;
        app.on_completion(rx.recv().await.unwrap());

        let relaunch = PreferenceManager::load(db, "default").await.unwrap();
        assert_eq!(
            prefs.is_onboarding_completed(),
            relaunch.is_onboarding_completed()
        );
    }

    #[tokio::test]
    async fn reset_clears_a_committed_flag() {
        let (mut app, _rx, prefs) = test_app().await;
        prefs.set_onboarding_completed(true).await.unwrap();
        let out = run(&mut app, "reset").await;
        assert!(out.starts_with("Onboarding flag cleared"));
        assert!(!prefs.is_onboarding_completed());
    }

    #[tokio::test]
    async fn exit_abandons_and_start_restarts() {
        let (mut app, _rx, _) = test_app().await;
        run(&mut app, "skill grammar").await;
        let out = run(&mut app, "exit").await;
        assert!(out.contains("[start]"));
        assert_eq!(run(&mut app, "exit").await, "Already on home.");

        run(&mut app, "start").await;
        assert_eq!(app.sequencer().current(), Screen::SkillStep);
        assert!(app.controller().selection().selected_skill_id().is_none());
    }

    #[tokio::test]
    async fn retry_only_after_failure() {
        let (mut app, _rx, _) = test_app().await;
        assert_eq!(run(&mut app, "retry").await, "Nothing to retry.");

        let notice = app.on_completion(Err(OnboardingError::TaskAborted("test".into())));
        assert!(notice.contains("retry"));
        assert_eq!(run(&mut app, "retry").await, "Saving your progress again...");
    }

    #[tokio::test]
    async fn quit_returns_none() {
        let (mut app, _rx, _) = test_app().await;
        assert!(app.execute(Command::Quit).await.unwrap().is_none());
    }
}
