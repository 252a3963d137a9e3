/// Full schema of the record store. Every statement uses `IF NOT EXISTS`
/// so running the list against an already-initialized database is a no-op;
/// schema changes get a new statement here, never an ALTER path.
pub(crate) const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT UNIQUE NOT NULL,
        email TEXT UNIQUE NOT NULL,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL DEFAULT 'student',
        full_name TEXT,
        cohort TEXT,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        last_login TIMESTAMP,
        is_active BOOLEAN NOT NULL DEFAULT 1,
        avatar_url TEXT,
        bio TEXT
    )",
    "CREATE TABLE IF NOT EXISTS courses (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        course_code TEXT UNIQUE NOT NULL,
        teacher_id INTEGER,
        teacher_name TEXT NOT NULL,
        subject TEXT NOT NULL,
        chapter TEXT NOT NULL,
        level TEXT NOT NULL,
        content TEXT NOT NULL,
        keywords TEXT NOT NULL DEFAULT '[]',
        uploaded_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        visible BOOLEAN NOT NULL DEFAULT 1,
        exercises_generated INTEGER NOT NULL DEFAULT 0,
        FOREIGN KEY (teacher_id) REFERENCES users(id) ON DELETE SET NULL
    )",
    "CREATE TABLE IF NOT EXISTS exercises (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        exercise_code TEXT UNIQUE NOT NULL,
        course_id INTEGER,
        subject TEXT NOT NULL,
        kind TEXT NOT NULL,
        question TEXT NOT NULL,
        options TEXT NOT NULL DEFAULT '[]',
        correct_index INTEGER,
        solution TEXT,
        explanation TEXT,
        level TEXT NOT NULL,
        difficulty TEXT,
        concepts TEXT NOT NULL DEFAULT '[]',
        estimated_time TEXT,
        source TEXT NOT NULL DEFAULT 'ai',
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (course_id) REFERENCES courses(id) ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS projects (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER,
        name TEXT NOT NULL,
        kind TEXT NOT NULL,
        description TEXT,
        start_date DATE,
        end_date DATE,
        status TEXT NOT NULL,
        technologies TEXT NOT NULL DEFAULT '[]',
        tasks TEXT NOT NULL DEFAULT '[]',
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS flashcards (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER,
        subject TEXT NOT NULL,
        question TEXT NOT NULL,
        answer TEXT NOT NULL,
        explanation TEXT,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        last_reviewed TIMESTAMP,
        difficulty TEXT,
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS portfolios (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER UNIQUE NOT NULL,
        full_name TEXT,
        headline TEXT,
        bio TEXT,
        email TEXT,
        github TEXT,
        linkedin TEXT,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS portfolio_projects (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        portfolio_id INTEGER NOT NULL,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        category TEXT,
        duration TEXT,
        technologies TEXT NOT NULL DEFAULT '[]',
        github TEXT,
        demo TEXT,
        results TEXT,
        FOREIGN KEY (portfolio_id) REFERENCES portfolios(id) ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS portfolio_skills (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        portfolio_id INTEGER NOT NULL,
        skill TEXT NOT NULL,
        level TEXT NOT NULL,
        FOREIGN KEY (portfolio_id) REFERENCES portfolios(id) ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS forum_posts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER,
        author TEXT NOT NULL,
        title TEXT NOT NULL,
        subject TEXT NOT NULL,
        body TEXT NOT NULL,
        code TEXT,
        tags TEXT NOT NULL DEFAULT '[]',
        posted_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        resolved BOOLEAN NOT NULL DEFAULT 0,
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE SET NULL
    )",
    "CREATE TABLE IF NOT EXISTS forum_replies (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        post_id INTEGER NOT NULL,
        user_id INTEGER,
        author TEXT NOT NULL,
        body TEXT NOT NULL,
        code TEXT,
        replied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (post_id) REFERENCES forum_posts(id) ON DELETE CASCADE,
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE SET NULL
    )",
    "CREATE TABLE IF NOT EXISTS business_case_submissions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        student_id INTEGER,
        case_id INTEGER NOT NULL,
        title TEXT NOT NULL,
        description TEXT,
        results TEXT,
        level TEXT,
        submitted_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (student_id) REFERENCES users(id) ON DELETE SET NULL
    )",
    "CREATE TABLE IF NOT EXISTS student_progress (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        exercise_id INTEGER NOT NULL,
        completed BOOLEAN NOT NULL DEFAULT 0,
        score REAL,
        attempts INTEGER NOT NULL DEFAULT 0,
        last_attempt TIMESTAMP,
        UNIQUE(user_id, exercise_id),
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
        FOREIGN KEY (exercise_id) REFERENCES exercises(id) ON DELETE CASCADE
    )",
    "CREATE INDEX IF NOT EXISTS idx_courses_subject ON courses(subject)",
    "CREATE INDEX IF NOT EXISTS idx_courses_teacher ON courses(teacher_name)",
    "CREATE INDEX IF NOT EXISTS idx_exercises_subject ON exercises(subject)",
    "CREATE INDEX IF NOT EXISTS idx_exercises_course ON exercises(course_id)",
    "CREATE INDEX IF NOT EXISTS idx_forum_subject ON forum_posts(subject)",
    "CREATE INDEX IF NOT EXISTS idx_users_role ON users(role)",
];
