#![allow(dead_code)]

//! `SHOW CREATE TABLE` output captured from MySQL 8 for the tables used
//! across the integration tests.

use oxide_audit_core::{LineParser, SchemaParser, TableSchema};

pub const TABLE_WITH_AUTO_INCREMENT: &str = "CREATE TABLE `table_with_auto_increment` (
  `id` int NOT NULL AUTO_INCREMENT,
  `foo` char(20) DEFAULT NULL,
  PRIMARY KEY (`id`)
) ENGINE=InnoDB AUTO_INCREMENT=3 DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_0900_ai_ci";

pub const TABLE_WITH_COMPOUND_PRIMARY: &str = "CREATE TABLE `table_with_compound_primary` (
  `a` int NOT NULL,
  `b` int NOT NULL,
  `foo` char(20) DEFAULT NULL,
  PRIMARY KEY (`a`,`b`)
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_0900_ai_ci";

pub const TABLE_WITH_NO_PRIMARY: &str = "CREATE TABLE `table_with_no_primary` (
  `a` int NOT NULL,
  `b` int NOT NULL
) ENGINE=MyISAM DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_0900_ai_ci";

pub const TABLE_WITH_UNIQUE_KEY: &str = "CREATE TABLE `table_with_unique_key` (
  `id` int NOT NULL AUTO_INCREMENT,
  `foo` char(20) DEFAULT NULL,
  `bar` char(20) DEFAULT NULL,
  PRIMARY KEY (`id`),
  UNIQUE KEY `fubar` (`foo`,`bar`)
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_0900_ai_ci";

pub const GROUP_USERS: &str = "CREATE TABLE `group_users` (
  `group_id` int unsigned NOT NULL,
  `user_id` int unsigned NOT NULL,
  `joined` datetime NOT NULL,
  UNIQUE KEY `group_user` (`group_id`,`user_id`),
  KEY `group_users_user_id_idx` (`user_id`),
  CONSTRAINT `group_users_group_id` FOREIGN KEY (`group_id`) REFERENCES `groups` (`id`),
  CONSTRAINT `group_users_user_id` FOREIGN KEY (`user_id`) REFERENCES `users` (`id`)
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_0900_ai_ci";

pub const TABLE_WITH_PREFIX_KEY: &str = "CREATE TABLE `notes` (
  `slug` varchar(255) NOT NULL,
  `body` text,
  `order` int DEFAULT NULL,
  PRIMARY KEY (`slug`(32))
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4";

/// Output under `sql_mode=ANSI_QUOTES`.
pub const ANSI_QUOTED_UNIQUE_KEY: &str = r#"CREATE TABLE "ansi_items" (
  "id" int NOT NULL AUTO_INCREMENT,
  "foo" char(20) DEFAULT NULL,
  PRIMARY KEY ("id"),
  UNIQUE KEY "fubar" ("foo")
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4"#;

pub fn parse(ddl: &str) -> TableSchema {
    LineParser::new()
        .parse(ddl)
        .unwrap_or_else(|e| panic!("Failed to parse: {ddl}\nError: {e:?}"))
}
