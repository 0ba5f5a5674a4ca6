//! 演示数据
//!
//! 启动时 (`SEED_DEMO_DATA=true`) 填充空存储：管理员、两个客户、两位专业人员
//! (含关联账号和每周排班)、两家门店、服务、商品以及少量历史预约。
//! 所有演示账号共用 `DEMO_PASSWORD`。

use chrono::{Days, NaiveTime};
use rust_decimal::Decimal;
use shared::models::{
    Appointment, AppointmentStatus, Branch, DaySchedule, LoyaltyConfig, Preferences, Product,
    Professional, Role, Service, User, WeeklySchedule,
};
use thiserror::Error;

use super::{RepoError, Store};
use crate::auth::password::hash_password;
use crate::auth::permissions;
use crate::utils::time::today;

/// Demo account emails
pub const DEMO_ADMIN_EMAIL: &str = "admin@salon.local";
pub const DEMO_CLIENT_EMAIL: &str = "lucia@example.com";
pub const DEMO_CLIENT2_EMAIL: &str = "marco@example.com";
pub const DEMO_PRO_EMAIL: &str = "carmen@salon.local";
pub const DEMO_PRO2_EMAIL: &str = "diego@salon.local";

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error(transparent)]
    Store(#[from] RepoError),
}

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN)
}

fn money(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

fn user(name: &str, email: &str, role: Role, permissions: Vec<String>, hash: &str) -> User {
    User {
        id: shared::util::snowflake_id(),
        name: name.to_string(),
        email: email.to_string(),
        phone: None,
        role,
        permissions,
        preferences: Preferences::default(),
        avatar: None,
        loyalty_points: 0,
        is_active: true,
        password_hash: hash.to_string(),
        created_at: shared::util::now_millis(),
    }
}

fn service(name: &str, category: &str, price_cents: i64, minutes: u32, loyalty: bool) -> Service {
    Service {
        id: shared::util::snowflake_id(),
        name: name.to_string(),
        description: None,
        category: Some(category.to_string()),
        price: money(price_cents),
        duration_minutes: minutes,
        commission: Decimal::from(40),
        loyalty: LoyaltyConfig {
            enabled: loyalty,
            points_per_visit: 10,
            visits_for_reward: 10,
        },
        is_active: true,
    }
}

fn product(name: &str, price_cents: i64, stock: i32, min_stock: i32) -> Product {
    Product {
        id: shared::util::snowflake_id(),
        name: name.to_string(),
        description: None,
        price: money(price_cents),
        stock,
        min_stock,
        is_active: true,
    }
}

/// 填充演示数据；存储非空时跳过
pub async fn seed_demo_data(store: &Store, demo_password: &str) -> Result<bool, SeedError> {
    if !store.users.is_empty() {
        tracing::debug!("Store already populated, skipping demo data");
        return Ok(false);
    }

    // One hash for every demo account
    let hash = hash_password(demo_password).map_err(|e| SeedError::Hash(e.to_string()))?;

    // Branches
    let centro = store
        .branches
        .insert(Branch {
            id: shared::util::snowflake_id(),
            name: "Centro".to_string(),
            address: "Calle Mayor 12".to_string(),
            phone: Some("+34 910 000 001".to_string()),
            is_active: true,
        })
        .await?;
    let norte = store
        .branches
        .insert(Branch {
            id: shared::util::snowflake_id(),
            name: "Norte".to_string(),
            address: "Avenida del Norte 48".to_string(),
            phone: Some("+34 910 000 002".to_string()),
            is_active: true,
        })
        .await?;

    // Users
    store
        .users
        .insert(user(
            "Admin",
            DEMO_ADMIN_EMAIL,
            Role::Admin,
            permissions::defaults_for(Role::Admin),
            &hash,
        ))
        .await?;
    let lucia = store
        .users
        .insert(user("Lucía Gómez", DEMO_CLIENT_EMAIL, Role::Client, vec![], &hash))
        .await?;
    store
        .users
        .insert(user("Marco Rossi", DEMO_CLIENT2_EMAIL, Role::Client, vec![], &hash))
        .await?;
    let carmen_user = store
        .users
        .insert(user(
            "Carmen Ruiz",
            DEMO_PRO_EMAIL,
            Role::Professional,
            vec![permissions::PRODUCTS_MANAGE.to_string()],
            &hash,
        ))
        .await?;
    let diego_user = store
        .users
        .insert(user(
            "Diego Martín",
            DEMO_PRO2_EMAIL,
            Role::Professional,
            vec![],
            &hash,
        ))
        .await?;

    // Services
    let haircut = store
        .services
        .insert(service("Haircut", "hair", 2500, 30, true))
        .await?;
    let coloring = store
        .services
        .insert(service("Hair coloring", "hair", 6000, 90, true))
        .await?;
    let manicure = store
        .services
        .insert(service("Manicure", "nails", 2000, 45, false))
        .await?;
    let beard = store
        .services
        .insert(service("Beard trim", "barber", 1500, 20, false))
        .await?;

    // Professionals
    let weekday = DaySchedule::working(hm(9, 0), hm(17, 0), centro.id);
    let carmen = store
        .professionals
        .insert(Professional {
            id: shared::util::snowflake_id(),
            user_id: carmen_user.id,
            name: carmen_user.name.clone(),
            specialty: Some("Hair".to_string()),
            services: vec![haircut.id, coloring.id],
            schedule: WeeklySchedule {
                monday: weekday.clone(),
                tuesday: weekday.clone(),
                wednesday: weekday.clone(),
                thursday: weekday.clone(),
                friday: weekday,
                saturday: DaySchedule::working(hm(10, 0), hm(14, 0), norte.id),
                sunday: DaySchedule::off(),
            },
            is_active: true,
        })
        .await?;

    let long_day = DaySchedule::working(hm(10, 0), hm(19, 0), norte.id);
    store
        .professionals
        .insert(Professional {
            id: shared::util::snowflake_id(),
            user_id: diego_user.id,
            name: diego_user.name.clone(),
            specialty: Some("Nails & barber".to_string()),
            services: vec![manicure.id, beard.id, haircut.id],
            schedule: WeeklySchedule {
                monday: DaySchedule::off(),
                tuesday: long_day.clone(),
                wednesday: long_day.clone(),
                thursday: long_day.clone(),
                friday: long_day.clone(),
                saturday: long_day,
                sunday: DaySchedule::off(),
            },
            is_active: true,
        })
        .await?;

    // Products
    store.products.insert(product("Argan oil", 1250, 8, 3)).await?;
    store.products.insert(product("Shampoo", 990, 2, 5)).await?;
    store.products.insert(product("Hair wax", 790, 15, 4)).await?;

    // History for the first client
    let now = shared::util::now_millis();
    let past = |days: u64| today().checked_sub_days(Days::new(days)).unwrap_or_else(today);
    store
        .appointments
        .insert(Appointment {
            id: shared::util::snowflake_id(),
            client_id: lucia.id,
            professional_id: carmen.id,
            service_id: haircut.id,
            branch_id: Some(centro.id),
            date: past(7),
            time: hm(10, 0),
            duration_minutes: haircut.duration_minutes,
            status: AppointmentStatus::Completed,
            price: haircut.price,
            rating: Some(5),
            notes: None,
            created_at: now,
            updated_at: now,
        })
        .await?;
    store
        .appointments
        .insert(Appointment {
            id: shared::util::snowflake_id(),
            client_id: lucia.id,
            professional_id: carmen.id,
            service_id: coloring.id,
            branch_id: Some(centro.id),
            date: past(3),
            time: hm(11, 0),
            duration_minutes: coloring.duration_minutes,
            status: AppointmentStatus::Cancelled,
            price: coloring.price,
            rating: None,
            notes: Some("Rescheduling".to_string()),
            created_at: now,
            updated_at: now,
        })
        .await?;

    tracing::info!(
        users = store.users.len(),
        professionals = store.professionals.len(),
        services = store.services.len(),
        products = store.products.len(),
        "Demo data seeded"
    );
    Ok(true)
}
