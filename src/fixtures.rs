#[cfg(test)]
pub mod test {
    use chrono::TimeDelta;

    use crate::RecordMap;

    #[derive(Default)]
    pub struct TestConfig {
        pub foo: Foo,
        pub bar: i32,
        pub baz: Baz,
        pub dummy: Dummy,
        pub tls: Option<Box<Tls>>,
        pub ext: RecordMap,
        pub callback: Option<fn()>,
    }

    crate::record!(TestConfig {
        foo: nested,
        bar,
        baz: nested,
        dummy: nested,
        tls: optional,
        ext: map,
    });

    #[derive(Default)]
    pub struct Foo {
        pub key1: bool,
        pub key2: i8,
        pub key3: i16,
        pub key4: i32,
        pub key5: i64,
        pub key6: u8,
        pub key7: u16,
        pub key8: u32,
        pub key9: u64,
        pub key10: f32,
        pub key11: f64,
        pub key12: String,
        pub key13: Vec<String>,
    }

    crate::record!(Foo {
        key1, key2, key3, key4, key5, key6, key7, key8, key9, key10, key11, key12, key13,
    });

    #[derive(Default)]
    pub struct Baz {
        pub quux: Quux,
        pub interval: TimeDelta,
        pub embed: Embed,
        pub embed1: Embed1,
        pub embed2: Embed2,
    }

    crate::record!(Baz {
        quux: nested,
        interval,
        embed: inline,
        embed1: nested,
        embed2: nested,
    });

    #[derive(Default)]
    pub struct Quux {
        pub key_a: String,
        pub key_b: bool,
    }

    crate::record!(Quux { key_a, key_b });

    #[derive(Default)]
    pub struct Embed {
        pub embedded: bool,
    }

    crate::record!(Embed { embedded });

    #[derive(Default)]
    pub struct Embed1 {
        pub base: Embed,
    }

    crate::record!(Embed1 { base: inline });

    #[derive(Default)]
    pub struct Embed2 {
        pub base: Option<Box<Embed>>,
    }

    crate::record!(Embed2 { base: inline_optional });

    #[derive(Default)]
    pub struct Dummy {}

    crate::record!(Dummy {});

    #[derive(Default)]
    pub struct Tls {
        pub cert: String,
        pub verify: bool,
    }

    crate::record!(Tls { cert, verify });

    #[derive(Default)]
    pub struct ExtA {
        pub average: i64,
    }

    crate::record!(ExtA { average });

    #[derive(Default)]
    pub struct ExtB {
        pub beverage: i64,
    }

    crate::record!(ExtB { beverage });

    /// A config with a non-zero default, an allocated inline optional record
    /// and two registered extensions.
    pub fn new_test_config() -> TestConfig {
        let mut config = TestConfig {
            bar: 67890,
            ..TestConfig::default()
        };
        config.baz.embed2.base = Some(Box::default());
        config.ext.insert("a", ExtA::default());
        config.ext.insert("b", ExtB::default());
        config
    }

    pub const TEST_CONFIG_TOML: &str = r#"bar = 12345

[foo]
key1 = true
key2 = -128
key3 = -32768
key4 = -11
key5 = -100000000000000
key6 = 255
key7 = 65535
key8 = 11
key9 = 100000000000000
key10 = 1.5e+00
key11 = 1.0000000000005e+00
key12 = "hello, world"
key13 = ["hello", "world"]

[baz]
interval = "10h9m8.007006005s"
embedded = true

[baz.quux]
key_a = "true"
key_b = true

[baz.embed1]
embedded = true

[baz.embed2]
embedded = true

[ext.a]
average = 123

[ext.b]
beverage = 456
"#;

    /// Assert every value written by `TEST_CONFIG_TOML`.
    pub fn assert_test_config_values(c: &TestConfig) {
        assert!(c.foo.key1);
        assert_eq!(c.foo.key2, -128);
        assert_eq!(c.foo.key3, -32768);
        assert_eq!(c.foo.key4, -11);
        assert_eq!(c.foo.key5, -100_000_000_000_000);
        assert_eq!(c.foo.key6, 255);
        assert_eq!(c.foo.key7, 65535);
        assert_eq!(c.foo.key8, 11);
        assert_eq!(c.foo.key9, 100_000_000_000_000);
        assert_eq!(c.foo.key10, 1.5);
        assert_eq!(c.foo.key11, 1.0000000000005);
        assert_eq!(c.foo.key12, "hello, world");
        assert_eq!(c.foo.key13, ["hello", "world"]);
        assert_eq!(c.bar, 12345);
        assert_eq!(c.baz.quux.key_a, "true");
        assert!(c.baz.quux.key_b);
        assert!(c.baz.embed.embedded);
        assert!(c.baz.embed1.base.embedded);
        assert!(c.baz.embed2.base.as_ref().unwrap().embedded);
        assert_eq!(
            c.baz.interval,
            TimeDelta::seconds(10 * 3600 + 9 * 60 + 8) + TimeDelta::nanoseconds(7_006_005)
        );
        assert_eq!(c.ext.downcast_ref::<ExtA>("a").unwrap().average, 123);
        assert_eq!(c.ext.downcast_ref::<ExtB>("b").unwrap().beverage, 456);
    }

    #[test]
    fn new_test_config_registers_extensions() {
        let config = new_test_config();
        assert_eq!(config.bar, 67890);
        assert_eq!(config.ext.len(), 2);
        assert!(config.baz.embed2.base.is_some());
        assert!(config.tls.is_none());
        assert!(config.callback.is_none());
    }
}
