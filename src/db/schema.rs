use rusqlite::Connection;

/// Initialize the document store schema.
pub fn init_db(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA foreign_keys = ON;

        -- Identity provider: credentials only
        CREATE TABLE IF NOT EXISTS accounts (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_accounts_email ON accounts(email);

        -- Profile store: role is free text, only 'admin' is privileged
        CREATE TABLE IF NOT EXISTS profiles (
            user_id TEXT PRIMARY KEY REFERENCES accounts(id) ON DELETE CASCADE,
            role TEXT NOT NULL DEFAULT 'user',
            updated_at INTEGER NOT NULL
        );

        -- created_by is not a foreign key: it is an opaque identity and
        -- must survive independently of the account row
        CREATE TABLE IF NOT EXISTS recipes (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            cooking_time INTEGER NOT NULL,
            difficulty TEXT NOT NULL CHECK (difficulty IN ('Easy', 'Medium', 'Hard')),
            cuisine_type TEXT NOT NULL,
            created_by TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_recipes_created_by ON recipes(created_by);

        CREATE TABLE IF NOT EXISTS ingredients (
            id TEXT PRIMARY KEY,
            recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            quantity TEXT NOT NULL,
            unit TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_ingredients_recipe ON ingredients(recipe_id);

        CREATE TABLE IF NOT EXISTS reviews (
            id TEXT PRIMARY KEY,
            recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            user_id TEXT NOT NULL,
            rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
            comment TEXT NOT NULL,
            created_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_reviews_recipe ON reviews(recipe_id);

        CREATE TABLE IF NOT EXISTS favorites (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            added_at INTEGER NOT NULL,
            UNIQUE(user_id, recipe_id)
        );
        CREATE INDEX IF NOT EXISTS idx_favorites_user ON favorites(user_id);
        "#,
    )
}
