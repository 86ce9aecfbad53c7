//! Public catalog commands.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use coursekit_core::Course;

use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct CoursesArgs {
    /// Print the catalog as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn courses(args: CoursesArgs, ctx: &AppContext) -> Result<()> {
    let courses = output::settle(ctx.courseware()?.list_courses().await?)?.data;

    if args.json {
        return output::json_pretty(&courses);
    }

    print_courses(&courses);
    Ok(())
}

pub(crate) fn print_courses(courses: &[Course]) {
    if courses.is_empty() {
        eprintln!("{}", "No courses found.".dimmed());
        return;
    }

    for course in courses {
        println!(
            "{:>4}  {}  {}  {}",
            course.id,
            course.title.bold(),
            course.level.as_str().dimmed(),
            course.name_url
        );
    }
}
