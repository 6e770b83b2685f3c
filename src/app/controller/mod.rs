mod admin;
mod appointments;
mod auth;
mod doctors;
mod nurses;
mod payment;
mod profile;

pub use admin::AdminController;
pub use appointments::AppointmentController;
pub use auth::AuthController;
pub use doctors::DoctorController;
pub use lab_tests::LabTestController;
pub use nurses::NurseController;
pub use payment::PaymentController;
pub use profile::ProfileController;
