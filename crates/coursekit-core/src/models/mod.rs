//! Domain types exchanged with the backend.

mod course;
mod forms;
mod user;

pub use course::{Class, Course, Level};
pub use forms::{
    ClassEdit, CourseEdit, EmailAddress, EmailChange, LoginForm, NewClass, NewCourse,
    PasswordChange, PasswordRecovery, ProfileEdit, RecordId, Registration, RoleChange,
    Verification,
};
pub use user::{ProfileUpdate, Role, UserProfile, UserSummary, UserTotals};
