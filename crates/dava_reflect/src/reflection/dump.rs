use alloc::string::String;
use core::fmt::{self, Write};

use dava_utils::FastName;

use crate::TypeToken;
use crate::any::Any;
use crate::reflection::{Field, Reflection};

const INDENT: usize = 2;
const NAME_WIDTH: usize = 40;
const VALUE_WIDTH: usize = 25;
const TYPE_WIDTH: usize = 20;

fn print_any(out: &mut String, value: &Any) -> fmt::Result {
    macro_rules! try_print {
        ($($ty:ty),* $(,)?) => {$(
            if let Some(v) = value.get::<$ty>() {
                return write!(out, "{v}");
            }
        )*};
    }

    try_print!(i32, u32, i64, u64, f32, f64, usize, String, &'static str, FastName);
    out.push_str("???");
    Ok(())
}

fn print_value(out: &mut String, reflection: &Reflection<'_>) -> fmt::Result {
    if !reflection.is_valid() {
        out.push_str("__invalid__");
        return Ok(());
    }
    if reflection.value_type().is_none() {
        out.push_str("__null__");
        return Ok(());
    }
    let value = reflection.get_value();
    if value.is_empty()
        && let Some(target) = reflection.pointee()
    {
        return write!(out, "0x{:08x}", target.addr() as usize);
    }
    print_any(out, &value)
}

fn print_type(out: &mut String, ty: Option<TypeToken>) {
    if let Some(ty) = ty {
        let name = ty.short_name();
        let end = name.char_indices().nth(TYPE_WIDTH).map_or(name.len(), |(i, _)| i);
        out.push('(');
        out.push_str(&name[..end]);
        out.push(')');
    }
}

fn indent(out: &mut String, level: usize) {
    out.extend(core::iter::repeat_n(' ', level * INDENT));
}

/// Writes `field` and, up to `max_level`, its children and methods.
///
/// A `max_level` of zero prints the whole tree.
pub(crate) fn dump_field(out: &mut dyn Write, field: &Field<'_>, level: usize, max_level: usize) -> fmt::Result {
    if level > max_level && max_level != 0 {
        return Ok(());
    }

    let reflection = &field.reflection;
    let has_children = reflection.is_valid() && reflection.has_fields();

    let mut name = String::new();
    if let Some(owner) = field.inherit_from {
        write!(name, "{:>6}::", owner.type_token().short_name())?;
    }
    print_any(&mut name, &field.key)?;
    if max_level != 0 && has_children {
        name.push_str(if level < max_level { "[-]" } else { "[+]" });
    }

    let mut value = String::new();
    print_value(&mut value, reflection)?;
    let mut ty = String::new();
    print_type(&mut ty, reflection.value_type());

    let mut line = String::new();
    indent(&mut line, level);
    let name_width = NAME_WIDTH.saturating_sub(level * INDENT);
    write!(line, "{name:<name_width$} = {value:<VALUE_WIDTH$}{ty:<TYPE_WIDTH$}")?;
    out.write_str(line.trim_end())?;
    out.write_char('\n')?;

    if has_children {
        for child in reflection.fields() {
            dump_field(out, &child, level + 1, max_level)?;
        }
    }

    for method in reflection.methods() {
        let mut line = String::new();
        indent(&mut line, level + 1);
        write!(line, "{{}} {}(", method.name())?;
        let params = method.params();
        for (i, arg) in params.args().iter().enumerate() {
            if i > 0 {
                line.push_str(", ");
            }
            line.push_str(arg.short_name());
        }
        write!(line, ") -> {}", params.ret().short_name())?;
        out.write_str(&line)?;
        out.write_char('\n')?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use crate::any::Any;
    use crate::reflection::Field;
    use crate::registry::ReflectedTypeDB;
    use crate::{Reflection, ReflectionRegistrator, impl_reflected, member};

    use super::dump_field;

    #[derive(Clone, Default)]
    struct Size {
        w: i32,
        h: i32,
    }
    impl_reflected!(Size: Clone);

    #[derive(Clone, Default)]
    struct Window {
        title: String,
        size: Size,
    }
    impl_reflected!(Window: Clone);

    impl Window {
        fn area(&self) -> i32 {
            self.size.w * self.size.h
        }
    }

    fn register(db: &ReflectedTypeDB) {
        ReflectionRegistrator::<Size>::begin(db)
            .field("w", member!(Size, w))
            .field("h", member!(Size, h))
            .end()
            .unwrap();
        ReflectionRegistrator::<Window>::begin(db)
            .field("title", member!(Window, title))
            .field("size", member!(Window, size))
            .method("area", Window::area)
            .end()
            .unwrap();
    }

    #[test]
    fn dump_layout() {
        let db = ReflectedTypeDB::new();
        register(&db);
        let mut window = Window {
            title: String::from("main"),
            size: Size { w: 4, h: 3 },
        };
        let mut out = String::new();
        Reflection::create(&db, &mut window).dump(&mut out, 0).unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("this"));
        assert!(lines[0].contains("(Window)"));
        assert!(lines[1].starts_with("  title"));
        assert!(lines[1].contains(" = main"));
        assert!(lines[2].starts_with("  size"));
        assert!(lines[2].contains(" = ???"));
        assert!(lines[3].starts_with("    w"));
        assert!(lines[3].contains(" = 4"));
        assert_eq!(lines[5], "  {} area() -> i32");
    }

    #[test]
    fn max_level_collapses_children() {
        let db = ReflectedTypeDB::new();
        register(&db);
        let mut window = Window::default();
        let mut out = String::new();
        Reflection::create(&db, &mut window).dump(&mut out, 1).unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("this[-]"));
        assert!(lines[2].starts_with("  size[+]"));
        assert!(!out.contains("    w"));
    }

    #[test]
    fn invalid_field() {
        let field = Field {
            key: Any::new("missing"),
            reflection: Reflection::invalid(),
            inherit_from: None,
        };
        let mut out = String::new();
        dump_field(&mut out, &field, 0, 0).unwrap();
        assert!(out.contains(" = __invalid__"));
    }
}
