//! Backend endpoint paths, relative to the API base URL.

// Authentication

/// POST `{email, password}`, answers with the user plus a token pair.
pub const LOGIN: &str = "auth/login";

/// POST new account details.
pub const REGISTER: &str = "auth/register";

/// POST `{email, verification_code}`, answers like [`LOGIN`].
pub const VERIFY: &str = "auth/verify";

pub const RESEND_CODE: &str = "auth/resendCode";

pub const FORGOT_PASSWORD: &str = "auth/forgotPassword";

pub const RECOVER_PASSWORD: &str = "auth/recoveryPassword";

// Signed-in client

pub const CURRENT_USER: &str = "client/getDataUser";

pub const EDIT_PROFILE: &str = "client/editProfile";

pub const EDIT_EMAIL: &str = "client/editEmail";

pub const EDIT_PASSWORD: &str = "client/editPassword";

// Public catalog

pub const LIST_COURSES: &str = "data/getCourses";

// Administration

pub const CREATE_COURSE: &str = "admin/createCourse";

pub const EDIT_COURSE: &str = "admin/editCourse";

pub const DELETE_COURSE: &str = "admin/deleteCourse";

pub const CREATE_CLASS: &str = "admin/createClass";

pub const EDIT_CLASS: &str = "admin/editClass";

pub const DELETE_CLASS: &str = "admin/deleteClass";

pub const FIND_USER: &str = "admin/getUser";

pub const CHANGE_ROLE: &str = "admin/editUserRole";

pub const USER_TOTALS: &str = "admin/getTotalUsers";
