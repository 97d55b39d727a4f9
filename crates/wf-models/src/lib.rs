//! # wf-models
//!
//! Row types and create/update DTOs for the four Wayfarer resources:
//! tours, users, reviews, and bookings. DTO invariants are declared with
//! `validator` derives; the API layer runs them before anything is written.

pub mod booking;
pub mod review;
pub mod tour;
pub mod user;

pub use booking::{BookingRow, CreateBookingDto, UpdateBookingDto};
pub use review::{CreateReviewDto, ReviewRow, UpdateReviewDto};
pub use tour::{
    CreateTourDto, Difficulty, MonthlyPlanEntry, TourDistance, TourRow, TourStats, UpdateTourDto,
};
pub use user::{
    CreateUserDto, LoginDto, SignupDto, UpdateMeDto, UpdatePasswordDto, UpdateUserDto, UserRow,
};
