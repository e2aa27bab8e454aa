//! 以字符串形式持久化的枚举
//!
//! 数据库中所有状态/类型列均为字符串，使用宏统一生成：
//! - serde 序列化（按存储值）
//! - 带提示的反序列化错误
//! - Display / FromStr / as_str
//! - ts-rs 导出

#[macro_export]
macro_rules! define_string_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($label:literal) {
            $($variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, ts_rs::TS)]
        $(#[$meta])*
        $vis enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    _ => Err(format!(
                        "无效的{}: '{}'. 支持: {}",
                        $label,
                        s,
                        [$($value),+].join(", ")
                    )),
                }
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    crate::define_string_enum! {
        enum Sample ("示例") {
            First => "first",
            SecondItem => "second_item",
        }
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("second_item".parse::<Sample>(), Ok(Sample::SecondItem));
        assert_eq!(Sample::First.to_string(), "first");
        assert_eq!(Sample::ALL.len(), 2);
    }

    #[test]
    fn test_invalid_value_lists_options() {
        let err = "third".parse::<Sample>().unwrap_err();
        assert!(err.contains("first, second_item"));
    }

    #[test]
    fn test_serde_uses_stored_value() {
        let json = serde_json::to_string(&Sample::SecondItem).unwrap();
        assert_eq!(json, "\"second_item\"");
        let parsed: Sample = serde_json::from_str("\"first\"").unwrap();
        assert_eq!(parsed, Sample::First);
        assert!(serde_json::from_str::<Sample>("\"nope\"").is_err());
    }
}
