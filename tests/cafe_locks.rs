use std::time::Duration;

use cafe_hub_be::services::CafeLocks;
use uuid::Uuid;

#[tokio::test]
async fn test_same_cafe_is_serialized() {
    let locks = CafeLocks::new();
    let cafe = Uuid::new_v4();

    let guard = locks.acquire(cafe).await;

    let contender = {
        let locks = locks.clone();
        tokio::spawn(async move {
            let _guard = locks.acquire(cafe).await;
        })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!contender.is_finished());

    drop(guard);
    tokio::time::timeout(Duration::from_secs(1), contender)
        .await
        .expect("waiter should acquire once the guard drops")
        .unwrap();
}

#[tokio::test]
async fn test_different_cafes_do_not_block() {
    let locks = CafeLocks::new();
    let _held = locks.acquire(Uuid::new_v4()).await;

    let other = tokio::time::timeout(Duration::from_millis(200), locks.acquire(Uuid::new_v4())).await;
    assert!(other.is_ok());
}
