//! Catalog and user administration. All endpoints require an admin session.

use tracing::instrument;

use coursekit_core::models::{
    ClassEdit, CourseEdit, EmailAddress, NewClass, NewCourse, RecordId, RoleChange, UserSummary,
    UserTotals,
};
use coursekit_core::{Class, Course, Outcome, Result};

use super::Courseware;
use crate::client::Payload;
use crate::endpoints::{
    CHANGE_ROLE, CREATE_CLASS, CREATE_COURSE, DELETE_CLASS, DELETE_COURSE, EDIT_CLASS, EDIT_COURSE,
    FIND_USER, USER_TOTALS,
};
use crate::request::ApiRequest;

impl Courseware {
    /// Create a course; answers with the updated course list.
    #[instrument(skip_all, fields(title = %form.title))]
    pub async fn create_course(&self, form: &NewCourse) -> Result<Outcome<Payload<Vec<Course>>>> {
        self.fetch(ApiRequest::post(CREATE_COURSE).authenticated().with_json(form)?)
            .await
    }

    #[instrument(skip_all, fields(id = form.id))]
    pub async fn edit_course(&self, form: &CourseEdit) -> Result<Outcome<Payload<Vec<Course>>>> {
        self.fetch(ApiRequest::put(EDIT_COURSE).authenticated().with_json(form)?)
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_course(&self, id: i64) -> Result<Outcome<Payload<Vec<Course>>>> {
        let request = ApiRequest::delete(DELETE_COURSE)
            .authenticated()
            .with_json(&RecordId { id })?;
        self.fetch(request).await
    }

    /// Create a class; answers with the class list of its course.
    #[instrument(skip_all, fields(title = %form.title, course = form.route_id))]
    pub async fn create_class(&self, form: &NewClass) -> Result<Outcome<Payload<Vec<Class>>>> {
        self.fetch(ApiRequest::post(CREATE_CLASS).authenticated().with_json(form)?)
            .await
    }

    #[instrument(skip_all, fields(id = form.id))]
    pub async fn edit_class(&self, form: &ClassEdit) -> Result<Outcome<Payload<Vec<Class>>>> {
        self.fetch(ApiRequest::put(EDIT_CLASS).authenticated().with_json(form)?)
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_class(&self, id: i64) -> Result<Outcome<Payload<Vec<Class>>>> {
        let request = ApiRequest::delete(DELETE_CLASS)
            .authenticated()
            .with_json(&RecordId { id })?;
        self.fetch(request).await
    }

    /// Look up a user by email.
    #[instrument(skip_all, fields(email = %form.email))]
    pub async fn find_user(&self, form: &EmailAddress) -> Result<Outcome<Payload<UserSummary>>> {
        self.fetch(ApiRequest::post(FIND_USER).authenticated().with_json(form)?)
            .await
    }

    #[instrument(skip_all, fields(email = %form.email, role = %form.role))]
    pub async fn change_role(&self, form: &RoleChange) -> Result<Outcome<Payload<UserSummary>>> {
        self.fetch(ApiRequest::put(CHANGE_ROLE).authenticated().with_json(form)?)
            .await
    }

    /// Count accounts per tier.
    #[instrument(skip(self))]
    pub async fn user_totals(&self) -> Result<Outcome<Payload<UserTotals>>> {
        self.fetch(ApiRequest::get(USER_TOTALS).authenticated())
            .await
    }
}
