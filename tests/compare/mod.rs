mod count_failing_links_per_side;
mod degrade_unreadable_entries_without_aborting;
mod flag_modification_time_mismatch_at_second_resolution;
mod produce_identical_tables_for_unchanged_trees;
mod reject_missing_left_root_without_walking_it;
mod report_one_row_per_path_across_both_trees;
#[cfg(unix)]
mod skip_directories_reached_through_symlinks;
