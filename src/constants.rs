//! Sheet names, seed data and quota defaults shared across the crate.

pub const USERS_SHEET: &str = "Users";
pub const LEAVES_SHEET: &str = "Leaves";
pub const SETTINGS_SHEET: &str = "Settings";
pub const HOLIDAYS_SHEET: &str = "Holidays";

pub const REQUIRED_SHEETS: [&str; 4] =
    [USERS_SHEET, LEAVES_SHEET, SETTINGS_SHEET, HOLIDAYS_SHEET];

/// Default per-category quotas applied when a user row or create input
/// leaves a counter blank. 999 means effectively unlimited.
pub mod default_quota {
    pub const ANNUAL: u32 = 10;
    pub const SICK: u32 = 30;
    pub const PERSONAL: u32 = 6;
    pub const MATERNITY: u32 = 120;
    pub const STERILIZATION: u32 = 999;
    pub const UNPAID: u32 = 999;
    pub const COMPASSIONATE: u32 = 3;
}

/// The distinguished admin identity. This row is seeded on first setup and
/// can never be deleted.
pub const ADMIN_EMP_ID: &str = "ADMIN001";
pub const ADMIN_NAME: &str = "ผู้ดูแลระบบ";
pub const ADMIN_SEED_PASSWORD: &str = "admin123";

/// Policy setting keys together with their typed defaults, in the order they
/// are seeded into the Settings sheet.
pub const POLICY_DEFAULTS: [(&str, &str); 10] = [
    ("annualLeaveMax", "10"),
    ("sickLeaveMax", "30"),
    ("personalLeaveMax", "6"),
    ("maternityLeaveMax", "120"),
    ("sterilizationLeaveMax", "999"),
    ("unpaidLeaveMax", "999"),
    ("compassionateLeaveMax", "3"),
    ("minAdvanceNoticeDays", "3"),
    ("carryOverEnabled", "false"),
    ("carryOverMaxDays", "5"),
];

// Thai public holidays seeded into the Holidays sheet on first setup.
pub const DEFAULT_HOLIDAYS_2025: [(&str, &str); 18] = [
    ("2025-01-01", "วันขึ้นปีใหม่"),
    ("2025-02-12", "วันตรุษจีน"),
    ("2025-04-06", "วันจักรี"),
    ("2025-04-13", "วันสงกรานต์"),
    ("2025-04-14", "วันสงกรานต์"),
    ("2025-04-15", "วันสงกรานต์"),
    ("2025-05-01", "วันแรงงานแห่งชาติ"),
    ("2025-05-05", "วันฉัตรมงคล"),
    ("2025-05-12", "วันพืชมงคล (ชดเชย)"),
    ("2025-06-03", "วันเฉลิมพระชนมพรรษาสมเด็จพระนางเจ้าสุทิดา"),
    ("2025-07-28", "วันเฉลิมพระชนมพรรษาพระบาทสมเด็จพระเจ้าอยู่หัว"),
    ("2025-07-29", "วันเฉลิมพระชนมพรรษาพระบาทสมเด็จพระเจ้าอยู่หัว (ชดเชย)"),
    ("2025-08-12", "วันแม่แห่งชาติ"),
    (
        "2025-10-13",
        "วันคล้ายวันสวรรคตพระบาทสมเด็จพระบรมชนกาธิเบศร มหาภูมิพลอดุลยเดชมหาราช บรมนาถบพิตร",
    ),
    ("2025-10-23", "วันปิยมหาราช"),
    ("2025-12-05", "วันพ่อแห่งชาติ"),
    ("2025-12-10", "วันรัฐธรรมนูญ"),
    ("2025-12-31", "วันสิ้นปี"),
];
