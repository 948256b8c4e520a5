pub mod table;

pub use table::{
    print_json, render_departments, render_slas, render_ticket_summary, render_topics,
    render_users,
};
