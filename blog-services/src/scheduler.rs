//! Publishing schedule
//!
//! Computes when the next automated post is due, tracks generation outcomes
//! and runs the background loop that triggers [`BlogAutomation::run_once`].
//! All times are UTC; the configured timezone is validated and reported only.

use std::env;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeDelta, Timelike, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio::time::interval;
use tracing::{debug, error, info, warn};

use crate::automation::BlogAutomation;

pub const SUPPORTED_TIMEZONES: &[&str] = &["UTC", "America/New_York", "Europe/London", "Asia/Tokyo"];

const MAX_POSTS_PER_WEEK: u32 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    /// Spread `posts_per_week` posts evenly over the week
    Custom,
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "custom" => Ok(Self::Custom),
            other => Err(format!("Unknown schedule frequency: {}", other)),
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Custom => "custom",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConfig {
    pub frequency: Frequency,
    pub posts_per_week: u32,
    /// "HH:MM"
    pub time_of_day: String,
    pub timezone: String,
    pub enabled: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            frequency: Frequency::Custom,
            posts_per_week: 3,
            time_of_day: "09:00".to_string(),
            timezone: "UTC".to_string(),
            enabled: true,
        }
    }
}

impl ScheduleConfig {
    /// Defaults overridden by `BLOG_SCHEDULE_*` variables; unparseable values are ignored
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(value) = env::var("BLOG_SCHEDULE_FREQUENCY") {
            match value.parse() {
                Ok(frequency) => config.frequency = frequency,
                Err(e) => warn!("{}", e),
            }
        }
        if let Some(posts) = env::var("BLOG_SCHEDULE_POSTS_PER_WEEK")
            .ok()
            .and_then(|v| v.trim().parse().ok())
        {
            config.posts_per_week = posts;
        }
        if let Ok(time) = env::var("BLOG_SCHEDULE_TIME") {
            config.time_of_day = time.trim().to_string();
        }
        if let Ok(timezone) = env::var("BLOG_SCHEDULE_TIMEZONE") {
            config.timezone = timezone.trim().to_string();
        }
        if let Ok(enabled) = env::var("BLOG_SCHEDULE_ENABLED") {
            config.enabled = !matches!(enabled.trim(), "0" | "false" | "off");
        }

        config
    }

    /// Days between posts for the custom frequency, as used in the cron form
    fn interval_days(&self) -> u32 {
        7 / self.posts_per_week.max(1)
    }

    /// Days between scheduled runs; more than seven posts a week still means one a day
    fn spacing_days(&self) -> i64 {
        i64::from(self.interval_days().max(1))
    }
}

/// Configured time of day, 09:00 when it cannot be parsed
fn scheduled_time(config: &ScheduleConfig) -> NaiveTime {
    let mut parts = config
        .time_of_day
        .split(':')
        .map(|p| p.trim().parse::<u32>().ok());
    let (hour, minute) = match (parts.next().flatten(), parts.next().flatten()) {
        (Some(h), Some(m)) => (h, m),
        _ => (9, 0),
    };

    NaiveTime::from_hms_opt(hour, minute, 0)
        .or_else(|| NaiveTime::from_hms_opt(9, 0, 0))
        .unwrap_or_default()
}

fn at(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    date.and_time(time).and_utc()
}

/// Next time a post is due
pub fn calculate_next_run(
    config: &ScheduleConfig,
    last_run: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let time = scheduled_time(config);

    match config.frequency {
        Frequency::Daily => {
            let today = at(now.date_naive(), time);
            if today <= now {
                today + TimeDelta::days(1)
            } else {
                today
            }
        }
        Frequency::Weekly => {
            // Monday of this week when today is Monday, otherwise the coming Monday
            let days = (8 - now.weekday().num_days_from_sunday()) % 7;
            let monday = at(now.date_naive(), time) + TimeDelta::days(i64::from(days));
            if monday <= now {
                monday + TimeDelta::days(7)
            } else {
                monday
            }
        }
        Frequency::Custom => {
            let step = config.spacing_days();
            let base = last_run.unwrap_or(now);
            let next = at(base.date_naive(), time) + TimeDelta::days(step);
            if next > now {
                return next;
            }
            // First slot after `now`, skipping those missed since `last_run`
            let missed = (now - next).num_days() / step + 1;
            next + TimeDelta::days(missed * step)
        }
    }
}

/// Cron form of the schedule; custom schedules yield one comma-separated entry per post
pub fn cron_expression(config: &ScheduleConfig) -> String {
    let time = scheduled_time(config);
    let (hour, minute) = (time.hour(), time.minute());

    match config.frequency {
        Frequency::Daily => format!("{} {} * * *", minute, hour),
        Frequency::Weekly => format!("{} {} * * 1", minute, hour),
        Frequency::Custom => {
            let interval = config.interval_days();
            (0..config.posts_per_week)
                .map(|i| format!("{} {} * * {}", minute, hour, (i * interval) % 7))
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

fn time_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([0-1]?[0-9]|2[0-3]):[0-5][0-9]$").expect("time pattern is valid")
    })
}

/// Every problem with `config`, or `Ok` when it can be scheduled
pub fn validate(config: &ScheduleConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if !(1..=MAX_POSTS_PER_WEEK).contains(&config.posts_per_week) {
        errors.push(format!(
            "Posts per week must be between 1 and {}",
            MAX_POSTS_PER_WEEK
        ));
    }
    if !time_pattern().is_match(&config.time_of_day) {
        errors.push("Time of day must be in HH:MM format".to_string());
    }
    if !SUPPORTED_TIMEZONES.contains(&config.timezone.as_str()) {
        errors.push("Invalid timezone specified".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationStats {
    pub total_generated: u32,
    pub successful_posts: u32,
    pub failed_attempts: u32,
    pub last_generated: Option<DateTime<Utc>>,
    pub next_scheduled: DateTime<Utc>,
}

impl GenerationStats {
    /// Percentage of attempts that produced a post
    pub fn success_rate(&self) -> f64 {
        if self.total_generated == 0 {
            return 0.0;
        }
        self.successful_posts as f64 / self.total_generated as f64 * 100.0
    }
}

/// Schedule plus the running tally of generation attempts
#[derive(Debug, Clone)]
pub struct AutomationManager {
    config: ScheduleConfig,
    stats: GenerationStats,
}

impl AutomationManager {
    pub fn new(config: ScheduleConfig, now: DateTime<Utc>) -> Self {
        let next_scheduled = calculate_next_run(&config, None, now);
        Self {
            config,
            stats: GenerationStats {
                total_generated: 0,
                successful_posts: 0,
                failed_attempts: 0,
                last_generated: None,
                next_scheduled,
            },
        }
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    pub fn stats(&self) -> &GenerationStats {
        &self.stats
    }

    pub fn update_config(&mut self, config: ScheduleConfig, now: DateTime<Utc>) {
        self.stats.next_scheduled = calculate_next_run(&config, None, now);
        self.config = config;
    }

    pub fn record_success(&mut self, now: DateTime<Utc>) {
        self.stats.total_generated += 1;
        self.stats.successful_posts += 1;
        self.stats.last_generated = Some(now);
        self.stats.next_scheduled = calculate_next_run(&self.config, Some(now), now);
    }

    /// Count a failed attempt; `last_generated` is left alone
    pub fn record_failure(&mut self, now: DateTime<Utc>) {
        self.stats.total_generated += 1;
        self.stats.failed_attempts += 1;
        self.stats.next_scheduled = calculate_next_run(&self.config, Some(now), now);
    }

    pub fn should_generate(&self, now: DateTime<Utc>) -> bool {
        self.config.enabled && now >= self.stats.next_scheduled
    }

    pub fn time_until_next(&self, now: DateTime<Utc>) -> Duration {
        (self.stats.next_scheduled - now)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    pub fn status_report(&self, now: DateTime<Utc>) -> String {
        let remaining = self.time_until_next(now).as_secs();
        let last = self
            .stats
            .last_generated
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "Never".to_string());

        format!(
            "Blog Automation Status:\n\
             - Enabled: {}\n\
             - Posts per week: {}\n\
             - Schedule: {} at {} {}\n\
             - Total generated: {}\n\
             - Success rate: {:.1}%\n\
             - Last generated: {}\n\
             - Next scheduled: {}\n\
             - Time until next: {}h {}m",
            if self.config.enabled { "Yes" } else { "No" },
            self.config.posts_per_week,
            self.config.frequency,
            self.config.time_of_day,
            self.config.timezone,
            self.stats.total_generated,
            self.stats.success_rate(),
            last,
            self.stats.next_scheduled.to_rfc3339(),
            remaining / 3600,
            (remaining % 3600) / 60,
        )
    }
}

/// Background service that publishes posts when the schedule says so
pub struct BlogScheduler {
    automation: Arc<BlogAutomation>,
    manager: Arc<RwLock<AutomationManager>>,
    poll_interval: Duration,
}

impl BlogScheduler {
    pub fn new(automation: Arc<BlogAutomation>, manager: Arc<RwLock<AutomationManager>>) -> Self {
        Self {
            automation,
            manager,
            poll_interval: Duration::from_secs(60),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Run the scheduling loop indefinitely
    pub async fn start(self: Arc<Self>) {
        {
            let manager = self.manager.read().await;
            info!(
                "Starting blog scheduler ({} {}), next post at {}",
                manager.config().frequency,
                manager.config().time_of_day,
                manager.stats().next_scheduled
            );
        }

        let mut ticker = interval(self.poll_interval);

        loop {
            ticker.tick().await;
            self.tick(Utc::now()).await;
        }
    }

    /// Generate a post if one is due at `now`; returns whether a run was attempted
    pub async fn tick(&self, now: DateTime<Utc>) -> bool {
        if !self.manager.read().await.should_generate(now) {
            debug!("No post due");
            return false;
        }

        let outcome = self.automation.run_once().await;
        let mut manager = self.manager.write().await;
        match outcome {
            Ok(result) => {
                info!("Scheduled post published at {}", result.url);
                manager.record_success(now);
            }
            Err(e) => {
                error!("Scheduled blog generation failed: {}", e);
                manager.record_failure(now);
            }
        }
        info!("Next post at {}", manager.stats().next_scheduled);

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn config(frequency: Frequency) -> ScheduleConfig {
        ScheduleConfig {
            frequency,
            ..ScheduleConfig::default()
        }
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_daily_next_run() {
        let daily = config(Frequency::Daily);
        // 2025-03-05 is a Wednesday
        assert_eq!(
            calculate_next_run(&daily, None, utc(2025, 3, 5, 8, 0)),
            utc(2025, 3, 5, 9, 0)
        );
        assert_eq!(
            calculate_next_run(&daily, None, utc(2025, 3, 5, 9, 0)),
            utc(2025, 3, 6, 9, 0)
        );
    }

    #[test]
    fn test_weekly_next_run_is_monday() {
        let weekly = config(Frequency::Weekly);
        assert_eq!(
            calculate_next_run(&weekly, None, utc(2025, 3, 5, 12, 0)),
            utc(2025, 3, 10, 9, 0)
        );
        // Sunday
        assert_eq!(
            calculate_next_run(&weekly, None, utc(2025, 3, 9, 12, 0)),
            utc(2025, 3, 10, 9, 0)
        );
        // Monday before the posting time stays on the same day
        assert_eq!(
            calculate_next_run(&weekly, None, utc(2025, 3, 10, 8, 0)),
            utc(2025, 3, 10, 9, 0)
        );
        // Monday after it moves to the next Monday
        assert_eq!(
            calculate_next_run(&weekly, None, utc(2025, 3, 10, 12, 0)),
            utc(2025, 3, 17, 9, 0)
        );
        assert_eq!(
            calculate_next_run(&weekly, None, utc(2025, 3, 10, 9, 0)),
            utc(2025, 3, 17, 9, 0)
        );
    }

    #[test]
    fn test_custom_next_run_spacing() {
        let custom = ScheduleConfig::default();
        let now = utc(2025, 3, 5, 15, 30);
        assert_eq!(calculate_next_run(&custom, None, now), utc(2025, 3, 7, 9, 0));
        assert_eq!(
            calculate_next_run(&custom, Some(utc(2025, 3, 4, 9, 0)), now),
            utc(2025, 3, 6, 9, 0)
        );
        // Slots missed since the last run are skipped, never scheduled in the past
        assert_eq!(
            calculate_next_run(&custom, Some(utc(2025, 3, 1, 9, 0)), now),
            utc(2025, 3, 7, 9, 0)
        );
        assert_eq!(
            calculate_next_run(&custom, Some(utc(2024, 1, 1, 9, 0)), now),
            utc(2025, 3, 6, 9, 0)
        );

        let weekly_once = ScheduleConfig {
            posts_per_week: 1,
            ..ScheduleConfig::default()
        };
        assert_eq!(
            calculate_next_run(&weekly_once, None, now),
            utc(2025, 3, 12, 9, 0)
        );
    }

    #[test]
    fn test_more_than_seven_posts_a_week_is_daily() {
        let busy = ScheduleConfig {
            posts_per_week: 10,
            ..ScheduleConfig::default()
        };
        let now = utc(2025, 3, 5, 8, 30);
        assert_eq!(calculate_next_run(&busy, None, now), utc(2025, 3, 6, 9, 0));
        assert_eq!(
            calculate_next_run(&busy, Some(utc(2025, 3, 5, 9, 0)), utc(2025, 3, 5, 9, 0)),
            utc(2025, 3, 6, 9, 0)
        );
        assert!(validate(&busy).is_ok());
    }

    /// Poll once a minute for an hour around the posting time
    fn runs_in_hour(config: ScheduleConfig, created: DateTime<Utc>, start: DateTime<Utc>) -> u32 {
        let mut manager = AutomationManager::new(config, created);
        let mut runs = 0;
        for minute in 0..60 {
            let now = start + TimeDelta::minutes(minute);
            if manager.should_generate(now) {
                manager.record_success(now);
                runs += 1;
            }
        }
        runs
    }

    #[test]
    fn test_busy_custom_schedule_runs_once_per_slot() {
        let busy = ScheduleConfig {
            posts_per_week: 10,
            ..ScheduleConfig::default()
        };
        // Created the previous morning, so the first slot is 2025-03-05 09:00
        let runs = runs_in_hour(busy, utc(2025, 3, 4, 9, 30), utc(2025, 3, 5, 8, 30));
        assert_eq!(runs, 1);
    }

    #[test]
    fn test_weekly_schedule_runs_once_on_monday() {
        // Created Sunday, first slot Monday 2025-03-10 09:00
        let runs = runs_in_hour(
            config(Frequency::Weekly),
            utc(2025, 3, 9, 10, 0),
            utc(2025, 3, 10, 8, 30),
        );
        assert_eq!(runs, 1);
    }

    #[test]
    fn test_failures_do_not_retry_every_poll() {
        let busy = ScheduleConfig {
            posts_per_week: 14,
            ..ScheduleConfig::default()
        };
        let mut manager = AutomationManager::new(busy, utc(2025, 3, 4, 9, 30));
        let mut attempts = 0;
        for minute in 0..60 {
            let now = utc(2025, 3, 5, 8, 30) + TimeDelta::minutes(minute);
            if manager.should_generate(now) {
                manager.record_failure(now);
                attempts += 1;
            }
        }
        assert_eq!(attempts, 1);
        assert_eq!(manager.stats().next_scheduled, utc(2025, 3, 6, 9, 0));
    }

    #[test]
    fn test_cron_expression() {
        assert_eq!(cron_expression(&config(Frequency::Daily)), "0 9 * * *");
        assert_eq!(cron_expression(&config(Frequency::Weekly)), "0 9 * * 1");
        assert_eq!(
            cron_expression(&ScheduleConfig {
                time_of_day: "14:30".to_string(),
                ..ScheduleConfig::default()
            }),
            "30 14 * * 0, 30 14 * * 2, 30 14 * * 4"
        );
    }

    #[test]
    fn test_validate() {
        assert!(validate(&ScheduleConfig::default()).is_ok());

        let errors = validate(&ScheduleConfig {
            posts_per_week: 15,
            time_of_day: "25:00".to_string(),
            timezone: "Mars/Olympus".to_string(),
            ..ScheduleConfig::default()
        })
        .unwrap_err();
        assert_eq!(errors.len(), 3);

        assert!(validate(&ScheduleConfig {
            time_of_day: "7:05".to_string(),
            timezone: "Asia/Tokyo".to_string(),
            posts_per_week: 14,
            ..ScheduleConfig::default()
        })
        .is_ok());
        assert!(validate(&ScheduleConfig {
            posts_per_week: 0,
            ..ScheduleConfig::default()
        })
        .is_err());
    }

    #[test]
    fn test_frequency_parsing() {
        assert_eq!("Daily".parse::<Frequency>(), Ok(Frequency::Daily));
        assert_eq!(" weekly ".parse::<Frequency>(), Ok(Frequency::Weekly));
        assert!("hourly".parse::<Frequency>().is_err());
    }

    #[test]
    fn test_manager_records_outcomes() {
        let now = utc(2025, 3, 5, 15, 30);
        let mut manager = AutomationManager::new(ScheduleConfig::default(), now);
        assert_eq!(manager.stats().next_scheduled, utc(2025, 3, 7, 9, 0));
        assert!(!manager.should_generate(now));
        assert!(manager.should_generate(utc(2025, 3, 7, 9, 0)));

        let run = utc(2025, 3, 7, 9, 1);
        manager.record_success(run);
        manager.record_failure(run);

        let stats = manager.stats();
        assert_eq!(stats.total_generated, 2);
        assert_eq!(stats.successful_posts, 1);
        assert_eq!(stats.failed_attempts, 1);
        assert_eq!(stats.last_generated, Some(run));
        assert_eq!(stats.next_scheduled, utc(2025, 3, 9, 9, 0));
        assert!((stats.success_rate() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_manager_disabled_and_update() {
        let now = utc(2025, 3, 5, 15, 30);
        let mut manager = AutomationManager::new(
            ScheduleConfig {
                enabled: false,
                ..ScheduleConfig::default()
            },
            now,
        );
        assert!(!manager.should_generate(utc(2030, 1, 1, 0, 0)));

        manager.update_config(config(Frequency::Daily), now);
        assert_eq!(manager.stats().next_scheduled, utc(2025, 3, 6, 9, 0));
        assert!(manager.should_generate(utc(2025, 3, 6, 9, 0)));
    }

    #[test]
    fn test_time_until_next_and_report() {
        let now = utc(2025, 3, 5, 15, 30);
        let manager = AutomationManager::new(ScheduleConfig::default(), now);

        assert_eq!(
            manager.time_until_next(now),
            Duration::from_secs((41 * 60 + 30) * 60)
        );
        assert_eq!(manager.time_until_next(utc(2025, 3, 8, 0, 0)), Duration::ZERO);

        let report = manager.status_report(now);
        assert!(report.starts_with("Blog Automation Status:"));
        assert!(report.contains("- Schedule: custom at 09:00 UTC"));
        assert!(report.contains("- Success rate: 0.0%"));
        assert!(report.contains("- Last generated: Never"));
        assert!(report.contains("- Time until next: 41h 30m"));
    }
}
