use tracing::instrument;

use coursekit_core::{Course, Outcome, Result};

use super::Courseware;
use crate::client::Payload;
use crate::endpoints::LIST_COURSES;
use crate::request::ApiRequest;

impl Courseware {
    /// List the public course catalog.
    #[instrument(skip(self))]
    pub async fn list_courses(&self) -> Result<Outcome<Payload<Vec<Course>>>> {
        self.fetch(ApiRequest::get(LIST_COURSES)).await
    }
}
