pub mod formatter;

pub use formatter::{
    format_activity_list, format_category_list, format_final_score, format_json, format_number,
    format_results_table, format_tsv, should_use_colors, DisplayOptions, ReportView,
};
