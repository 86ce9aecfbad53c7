//! Administration commands: catalog editing and user management.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;

use coursekit_core::models::{
    ClassEdit, CourseEdit, EmailAddress, NewClass, NewCourse, RoleChange, UserSummary,
};
use coursekit_core::{Class, Level, Role};

use crate::commands::catalog::print_courses;
use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct AdminCommand {
    #[command(subcommand)]
    pub command: AdminSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AdminSubcommand {
    /// Create, edit or delete courses
    #[command(subcommand)]
    Course(CourseSubcommand),

    /// Create, edit or delete classes
    #[command(subcommand)]
    Class(ClassSubcommand),

    /// Look up users and change their role
    #[command(subcommand)]
    User(UserSubcommand),
}

#[derive(Subcommand, Debug)]
pub enum CourseSubcommand {
    /// Create a course
    Create(CourseFields),

    /// Replace the fields of a course
    Edit {
        /// Course id
        #[arg(long)]
        id: i64,

        #[command(flatten)]
        fields: CourseFields,
    },

    /// Delete a course
    Delete {
        /// Course id
        id: i64,
    },
}

#[derive(Args, Debug)]
pub struct CourseFields {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub description: String,

    /// BASIC, INTERMEDIATE or ADVANCED
    #[arg(long, default_value = "BASIC")]
    pub level: Level,

    /// URL slug (lowercase letters and dashes)
    #[arg(long)]
    pub slug: String,

    #[arg(long)]
    pub image_url: Option<String>,
}

impl From<CourseFields> for NewCourse {
    fn from(fields: CourseFields) -> Self {
        NewCourse {
            title: fields.title,
            description: fields.description,
            level: fields.level,
            name_url: fields.slug,
            image_url: fields.image_url,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ClassSubcommand {
    /// Add a class to a course
    Create {
        /// Id of the owning course
        #[arg(long)]
        course: i64,

        #[command(flatten)]
        fields: ClassFields,
    },

    /// Replace the fields of a class
    Edit {
        /// Class id
        #[arg(long)]
        id: i64,

        #[command(flatten)]
        fields: ClassFields,
    },

    /// Delete a class
    Delete {
        /// Class id
        id: i64,
    },
}

#[derive(Args, Debug)]
pub struct ClassFields {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub description: String,

    /// Minimum role allowed to watch: FREE, PREMIUM or ADMIN
    #[arg(long, default_value = "FREE")]
    pub role: Role,

    #[arg(long)]
    pub video_url: String,
}

#[derive(Subcommand, Debug)]
pub enum UserSubcommand {
    /// Find a user by email
    Find {
        #[arg(long)]
        email: String,
    },

    /// Change a user's role
    SetRole {
        #[arg(long)]
        email: String,

        /// FREE, PREMIUM or ADMIN
        #[arg(long)]
        role: Role,
    },

    /// Count users per tier
    Totals,
}

pub async fn handle(cmd: AdminCommand, ctx: &AppContext) -> Result<()> {
    match cmd.command {
        AdminSubcommand::Course(cmd) => course(cmd, ctx).await,
        AdminSubcommand::Class(cmd) => class(cmd, ctx).await,
        AdminSubcommand::User(cmd) => user(cmd, ctx).await,
    }
}

async fn course(cmd: CourseSubcommand, ctx: &AppContext) -> Result<()> {
    let courseware = ctx.courseware()?;

    let (outcome, fallback) = match cmd {
        CourseSubcommand::Create(fields) => {
            let form = NewCourse::from(fields);
            form.validate()?;
            (courseware.create_course(&form).await?, "Course created")
        }
        CourseSubcommand::Edit { id, fields } => {
            let form = CourseEdit {
                id,
                course: fields.into(),
            };
            form.validate()?;
            (courseware.edit_course(&form).await?, "Course updated")
        }
        CourseSubcommand::Delete { id } => (courseware.delete_course(id).await?, "Course deleted"),
    };

    let payload = output::settle(outcome)?;
    output::confirm(payload.message.as_deref(), fallback);
    print_courses(&payload.data);
    Ok(())
}

async fn class(cmd: ClassSubcommand, ctx: &AppContext) -> Result<()> {
    let courseware = ctx.courseware()?;

    let (outcome, fallback) = match cmd {
        ClassSubcommand::Create { course, fields } => {
            let form = NewClass {
                title: fields.title,
                description: fields.description,
                role: fields.role,
                route_id: course,
                video_url: fields.video_url,
            };
            form.validate()?;
            (courseware.create_class(&form).await?, "Class created")
        }
        ClassSubcommand::Edit { id, fields } => {
            let form = ClassEdit {
                id,
                title: fields.title,
                description: fields.description,
                role: fields.role,
                video_url: fields.video_url,
            };
            form.validate()?;
            (courseware.edit_class(&form).await?, "Class updated")
        }
        ClassSubcommand::Delete { id } => (courseware.delete_class(id).await?, "Class deleted"),
    };

    let payload = output::settle(outcome)?;
    output::confirm(payload.message.as_deref(), fallback);
    print_classes(&payload.data);
    Ok(())
}

async fn user(cmd: UserSubcommand, ctx: &AppContext) -> Result<()> {
    let courseware = ctx.courseware()?;

    match cmd {
        UserSubcommand::Find { email } => {
            let form = EmailAddress::new(email);
            form.validate()?;
            let payload = output::settle(courseware.find_user(&form).await?)?;
            print_summary(&payload.data);
        }
        UserSubcommand::SetRole { email, role } => {
            let form = RoleChange { email, role };
            form.validate()?;
            let payload = output::settle(courseware.change_role(&form).await?)?;
            output::confirm(payload.message.as_deref(), "Role updated");
            print_summary(&payload.data);
        }
        UserSubcommand::Totals => {
            let totals = output::settle(courseware.user_totals().await?)?.data;
            output::field("Free", &totals.free.to_string());
            output::field("Premium", &totals.premium.to_string());
        }
    }
    Ok(())
}

fn print_classes(classes: &[Class]) {
    for class in classes {
        println!(
            "{:>4}  {:>2}. {}  {}",
            class.id,
            class.class_number,
            class.title.bold(),
            class.role.as_str().dimmed()
        );
    }
}

fn print_summary(user: &UserSummary) {
    output::field("Email", &user.email);
    output::field("Role", user.role.as_str());
}
