pub mod appointment;
pub mod doctor;
pub mod enums;
pub mod hospital;
pub mod id;
pub mod user;

pub use appointment::{Appointment, AppointmentPatch, AppointmentRequest, NewAppointment};
pub use doctor::{Doctor, DoctorPatch, DoctorRequest, NewDoctor};
pub use enums::{AppointmentStatus, InviteStatus, Role, Specialty, UnknownVariant};
pub use hospital::{GeoPoint, Hospital, HospitalPatch, HospitalRequest, Location, NewHospital};
pub use id::{DocumentId, InvalidId};
pub use user::{
    LoginRequest, LoginResponse, NewUser, PublicUser, RefreshRequest, RegisterUserRequest, TokenResponse, User,
    UserPatch,
};
