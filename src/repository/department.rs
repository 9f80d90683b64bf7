use crate::model::Department;
use sqlx::SqliteConnection;

pub async fn find_all(conn: &mut SqliteConnection) -> Result<Vec<Department>, sqlx::Error> {
    sqlx::query_as::<_, Department>("SELECT id, name FROM departments ORDER BY id")
        .fetch_all(conn)
        .await
}

pub async fn insert(conn: &mut SqliteConnection, name: &str) -> Result<i64, sqlx::Error> {
    let result = sqlx::query("INSERT INTO departments (name) VALUES (?)")
        .bind(name)
        .execute(conn)
        .await?;

    Ok(result.last_insert_rowid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::temp_pool;

    #[tokio::test]
    async fn departments_are_listed_in_id_order() {
        let (_dir, pool) = temp_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let ops = insert(&mut conn, "Operations").await.unwrap();
        let eng = insert(&mut conn, "Engineering").await.unwrap();

        let all = find_all(&mut conn).await.unwrap();
        assert_eq!(
            all,
            vec![
                Department { id: ops, name: "Operations".into() },
                Department { id: eng, name: "Engineering".into() },
            ]
        );
    }
}
