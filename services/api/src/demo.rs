use crate::infra::{InMemoryPortalRepository, DEMO_STUDENT_ID};
use chrono::{Local, NaiveDate};
use clap::Args;
use parent_portal::error::AppError;
use parent_portal::workflows::scheduling::{
    EligibilityConfig, LeaveReason, LeaveRequestService, LessonStanding, MakeupOption,
    RequestSubmission, ScheduleOverview, UnlimitedCapacity,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct ScheduleOverviewArgs {
    /// Student to inspect (defaults to the seeded demo student)
    #[arg(long)]
    pub(crate) student_id: Option<String>,
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Skip the request-submission portion of the demo.
    #[arg(long)]
    pub(crate) skip_submission: bool,
}

type DemoService = LeaveRequestService<InMemoryPortalRepository, UnlimitedCapacity>;

fn build_service(base: NaiveDate) -> Arc<DemoService> {
    Arc::new(LeaveRequestService::new(
        Arc::new(InMemoryPortalRepository::seeded(base)),
        Arc::new(UnlimitedCapacity),
        EligibilityConfig::default(),
    ))
}

pub(crate) fn run_schedule_overview(args: ScheduleOverviewArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let student = args
        .student_id
        .unwrap_or_else(|| DEMO_STUDENT_ID.to_string());

    let now = today
        .and_hms_opt(12, 0, 0)
        .unwrap_or_else(|| Local::now().naive_local());

    let service = build_service(today);
    let overview = service.schedule_overview(&student, now)?;

    render_overview(&overview);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let now = today
        .and_hms_opt(12, 0, 0)
        .unwrap_or_else(|| Local::now().naive_local());

    println!("Parent portal demo (evaluated {today})");
    let service = build_service(today);
    let overview = service.schedule_overview(DEMO_STUDENT_ID, now)?;
    render_overview(&overview);

    let Some(imminent) = overview
        .lessons
        .iter()
        .find(|entry| entry.standing == LessonStanding::WithinWindow)
    else {
        println!("\nNo lesson inside the reschedule window; demo ends here.");
        return Ok(());
    };

    println!(
        "\nMakeup slots for '{}' ({}):",
        imminent.lesson.name,
        imminent.standing.label()
    );
    let slots = service.resolve_makeup_slots(&imminent.lesson, now)?;
    if slots.is_empty() {
        println!("- no compatible sessions in other classes");
    }
    for slot in &slots {
        println!(
            "- {} {} {} | {} | available: {}",
            slot.date_display, slot.day, slot.time, slot.lesson_name, slot.available
        );
    }

    if args.skip_submission {
        return Ok(());
    }

    // A skip inside the window breaks policy; show the rejection first.
    let blocked = service.submit(
        RequestSubmission {
            student_id: DEMO_STUDENT_ID.to_string(),
            lesson: imminent.lesson.clone(),
            reason: LeaveReason::Family,
            description: None,
            makeup_option: MakeupOption::Skip,
            selected_time_slot: None,
        },
        now,
    );
    match blocked {
        Err(err) => println!("\nSkip inside the window rejected: {err}"),
        Ok(_) => println!("\nUnexpectedly accepted a skip inside the window"),
    }

    if let Some(slot) = slots.first() {
        let stored = service.submit(
            RequestSubmission {
                student_id: DEMO_STUDENT_ID.to_string(),
                lesson: imminent.lesson.clone(),
                reason: LeaveReason::Illness,
                description: Some("seeing the doctor".to_string()),
                makeup_option: MakeupOption::SpecificTime,
                selected_time_slot: Some(slot.clone()),
            },
            now,
        )?;
        println!(
            "Reschedule accepted: {} -> {}",
            stored.id.0,
            stored.makeup_summary()
        );
    }

    println!("\nRequest history:");
    for entry in service.request_history(DEMO_STUDENT_ID)? {
        println!(
            "- {} | {} | {} | {}",
            entry.id.0,
            entry.lesson_name,
            entry.status.label(),
            entry.makeup_summary
        );
    }

    Ok(())
}

fn render_overview(overview: &ScheduleOverview) {
    println!(
        "Schedule for {} (as of {})",
        overview.student_id, overview.today
    );
    println!(
        "Progress: {}/{} lessons attended, {} remaining",
        overview.progress.completed, overview.progress.total, overview.progress.remaining
    );

    if overview.upcoming.is_empty() {
        println!("No lessons inside the reschedule window.");
    } else {
        println!("Inside the reschedule window:");
        for entry in &overview.upcoming {
            let date = entry
                .lesson
                .normalized_date()
                .map(|d| d.to_string())
                .unwrap_or_else(|| "no date".to_string());
            println!("- {} ({date})", entry.lesson.name);
        }
    }

    println!("Lessons:");
    for entry in &overview.lessons {
        let date = entry
            .lesson
            .normalized_date()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "no date".to_string());
        let options = if entry.allowed_options.is_empty() {
            "none".to_string()
        } else {
            entry
                .allowed_options
                .iter()
                .map(|option| option.label())
                .collect::<Vec<_>>()
                .join(", ")
        };
        let badge = entry
            .request_status
            .map(|status| format!(" | request: {}", status.label()))
            .unwrap_or_default();
        println!(
            "- {} | {date} | {} | options: {options}{badge}",
            entry.lesson.name,
            entry.standing.label()
        );
    }
}
