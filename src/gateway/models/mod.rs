pub mod profile;
pub mod subscription;
pub mod user;

pub use profile::{NewProfile, ProfileRow, USERS_PROFILE};
pub use subscription::{
    NewSubscription, SubscriptionPackage, UserSubscription, SUBSCRIPTION_PACKAGES, USER_SUBSCRIPTIONS,
};
pub use user::{AuthSession, AuthUser};
