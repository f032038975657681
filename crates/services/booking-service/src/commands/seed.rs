//! Seed command - Demo accounts and sample events.
//!
//! Safe to run repeatedly: existing accounts are kept and events are only
//! added while the catalog holds fewer than the sample set.

use chrono::{DateTime, Duration, Utc};

use common::{AppError, AppResult};
use domain::{EventStatus, NewEvent, Password, User, UserRole};

use crate::cli::args::SeedArgs;
use crate::config::BookingServiceConfig;
use crate::infra::Database;
use crate::repository::{EventRepository, EventStore, UserRepository, UserStore};

struct SampleEvent {
    title: &'static str,
    description: &'static str,
    location: &'static str,
    capacity: i32,
    days_from_now: i64,
    status: EventStatus,
}

const SAMPLE_EVENTS: &[SampleEvent] = &[
    SampleEvent {
        title: "Tech Conference 2026",
        description: "Keynotes and workshops on AI, cloud computing and the future of software development.",
        location: "Paris Expo, Hall A",
        capacity: 500,
        days_from_now: 30,
        status: EventStatus::Published,
    },
    SampleEvent {
        title: "Startup Pitch Night",
        description: "Ten startups pitch to a panel of investors, followed by a networking session.",
        location: "Station F, Paris",
        capacity: 150,
        days_from_now: 14,
        status: EventStatus::Published,
    },
    SampleEvent {
        title: "Design Systems Workshop",
        description: "Hands-on workshop on design systems, component libraries and design/development handoff.",
        location: "WeWork La Defense",
        capacity: 40,
        days_from_now: 7,
        status: EventStatus::Published,
    },
    SampleEvent {
        title: "Cloud Architecture Summit",
        description: "Microservices, Kubernetes, serverless and multi-cloud strategies for enterprise applications.",
        location: "Convention Center Lyon",
        capacity: 300,
        days_from_now: 45,
        status: EventStatus::Published,
    },
    SampleEvent {
        title: "Women in Tech Meetup",
        description: "Monthly gathering with talks on career growth and mentorship sessions.",
        location: "Microsoft France, Issy",
        capacity: 80,
        days_from_now: 10,
        status: EventStatus::Published,
    },
    SampleEvent {
        title: "Cybersecurity Bootcamp",
        description: "Two-day bootcamp on ethical hacking, penetration testing and secure development.",
        location: "Epitech Paris",
        capacity: 25,
        days_from_now: 21,
        status: EventStatus::Draft,
    },
    SampleEvent {
        title: "React & Next.js Masterclass",
        description: "From React fundamentals to server rendering, server components and performance tuning.",
        location: "Le Wagon Paris",
        capacity: 60,
        days_from_now: 5,
        status: EventStatus::Published,
    },
    SampleEvent {
        title: "Product Management Forum",
        description: "Product leaders on roadmap prioritization, user research and cross-team collaboration.",
        location: "Numa Paris",
        capacity: 120,
        days_from_now: 18,
        status: EventStatus::Published,
    },
    SampleEvent {
        title: "AI & Ethics Symposium",
        description: "Panels on bias, transparency and responsible development of artificial intelligence.",
        location: "Sciences Po Paris",
        capacity: 200,
        days_from_now: 60,
        status: EventStatus::Draft,
    },
    SampleEvent {
        title: "DevOps Day Paris",
        description: "CI/CD pipelines, infrastructure as code, observability and DevOps culture.",
        location: "Dock Pullman",
        capacity: 250,
        days_from_now: 35,
        status: EventStatus::Published,
    },
];

/// What a seed run added
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub admin_created: bool,
    pub participant_created: bool,
    pub events_created: usize,
}

/// Execute the seed command
pub async fn execute(args: SeedArgs, config: BookingServiceConfig) -> AppResult<()> {
    let db = Database::connect(&config.database)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;
    let connection = db.get_connection();

    let report = seed(
        &UserStore::new(connection.clone()),
        &EventStore::new(connection),
        &args,
        Utc::now(),
    )
    .await?;

    println!(
        "Seed completed: admin {}, participant {}, {} events created",
        if report.admin_created { "created" } else { "kept" },
        if report.participant_created { "created" } else { "kept" },
        report.events_created
    );
    println!("Admin:       {}", args.admin_email);
    println!("Participant: {}", args.participant_email);

    Ok(())
}

/// Create the demo accounts and, unless the catalog is already populated,
/// the sample events organised by the admin.
pub async fn seed(
    users: &dyn UserRepository,
    events: &dyn EventRepository,
    args: &SeedArgs,
    now: DateTime<Utc>,
) -> AppResult<SeedReport> {
    let mut report = SeedReport::default();

    let (admin, created) =
        ensure_user(users, &args.admin_email, &args.password, UserRole::Admin).await?;
    report.admin_created = created;
    let (_, created) = ensure_user(
        users,
        &args.participant_email,
        &args.password,
        UserRole::Participant,
    )
    .await?;
    report.participant_created = created;

    let existing = events.list(None).await?.len();
    if existing >= SAMPLE_EVENTS.len() {
        tracing::info!(existing, "Events already present, skipping sample events");
        return Ok(report);
    }

    for sample in SAMPLE_EVENTS {
        let new_event = NewEvent {
            title: sample.title.to_string(),
            description: sample.description.to_string(),
            date: evening_of(now, sample.days_from_now),
            location: sample.location.to_string(),
            capacity: sample.capacity,
            status: sample.status,
            organizer_id: admin.id,
        };
        new_event.validate()?;

        let event = events.create(new_event).await?;
        tracing::debug!(event_id = %event.id, title = %event.title, "Sample event created");
        report.events_created += 1;
    }

    Ok(report)
}

async fn ensure_user(
    users: &dyn UserRepository,
    email: &str,
    password: &str,
    role: UserRole,
) -> AppResult<(User, bool)> {
    if let Some(user) = users.find_by_email(email).await? {
        tracing::info!(%email, "User already exists");
        return Ok((user, false));
    }

    let password_hash = Password::new(password)?.into_string();
    let user = users.create(email.to_string(), password_hash, role).await?;
    tracing::info!(%email, role = role.as_str(), "User created");
    Ok((user, true))
}

/// 18:00 UTC, `days` days after `now`
fn evening_of(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    let day = now + Duration::days(days);
    day.date_naive()
        .and_hms_opt(18, 0, 0)
        .map(|evening| evening.and_utc())
        .unwrap_or(day)
}
