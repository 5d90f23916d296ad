//! Demo data for the in-memory store.

use domain::{Book, Money, User};
use store::{Store, StoreError};

/// Bearer token for the seeded administrator account.
pub const ADMIN_TOKEN: &str = "admin-dev-token";

/// Bearer token for the seeded customer account.
pub const CUSTOMER_TOKEN: &str = "customer-dev-token";

/// Bearer token for the seeded disabled account.
pub const DISABLED_TOKEN: &str = "disabled-dev-token";

/// Seeds a small catalog and three accounts: an administrator, a customer,
/// and a disabled customer for exercising the access gate.
pub async fn seed_demo_data<S: Store>(store: &S) -> Result<(), StoreError> {
    let admin = User::admin("Quản trị viên", "admin@bookstore.vn", "0900000001");
    store.insert_user(&admin, ADMIN_TOKEN).await?;

    let customer = User::customer("Nguyễn Thị Lan", "lan@example.com", "0901234567");
    store.insert_user(&customer, CUSTOMER_TOKEN).await?;

    let mut disabled = User::customer("Tài khoản khóa", "khoa@example.com", "0909999999");
    disabled.is_active = false;
    store.insert_user(&disabled, DISABLED_TOKEN).await?;

    let books = [
        (
            "Dế Mèn Phiêu Lưu Ký",
            "Tô Hoài",
            120_000,
            Some(95_000),
            "de-men-phieu-luu-ky.jpg",
            50,
        ),
        ("Số Đỏ", "Vũ Trọng Phụng", 85_000, None, "so-do.jpg", 30),
        ("Tắt Đèn", "Ngô Tất Tố", 70_000, Some(59_000), "tat-den.jpg", 25),
        (
            "Truyện Kiều",
            "Nguyễn Du",
            150_000,
            None,
            "truyen-kieu.jpg",
            40,
        ),
        (
            "Nhật Ký Trong Tù",
            "Hồ Chí Minh",
            95_000,
            None,
            "nhat-ky-trong-tu.jpg",
            0,
        ),
    ];

    for (title, description, price, discount, cover, stock) in books {
        let book = Book::new(
            title,
            description,
            Money::from_minor(price),
            discount.map(Money::from_minor),
            cover,
            stock,
        )
        .expect("demo book is valid");
        store.insert_book(&book).await?;
    }

    tracing::info!("seeded demo catalog and accounts");
    Ok(())
}
